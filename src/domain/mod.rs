pub mod audio;
pub mod explain;
pub mod lesson;
pub mod quiz;
