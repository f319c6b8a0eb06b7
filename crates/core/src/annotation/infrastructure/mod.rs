pub mod bitmap_font;
pub mod cpu_pose_annotator;
pub mod raster;
