pub mod ffmpeg_reader;
pub mod jpeg_encoder;
