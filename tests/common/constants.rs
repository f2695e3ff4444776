pub const HEADER: &str =
    "Collection,SongId,Song,Description,Animation,Image,Artist,Genre,BPM,Duration,Release Date";

pub const SONG_A_ROW: &str =
    "1,1,A,d,http://a/b c.mp4,http://a/i.png,X,Y,120,3:00,2020";

/// One cell more than `HEADER` has columns.
pub const OVERLONG_ROW: &str = "1,2,B,d,http://b,http://b.png,Z,W,90,1:00,2019,extra";

pub const SONG_A_ANIMATION: &str = "http://a/b c.mp4";
pub const SONG_A_ANIMATION_ENCODED: &str = "http://a/b%20c.mp4";
