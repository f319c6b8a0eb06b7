pub mod joint_angle;
pub mod landmark;
pub mod pose_estimator;
pub mod skeleton;
