pub mod pipeline_error;
pub mod pipeline_logger;
pub mod pose_stream_use_case;
pub mod stream_session;
