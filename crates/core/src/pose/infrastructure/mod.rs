pub mod onnx_pose_estimator;
