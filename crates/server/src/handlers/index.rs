use axum::response::Html;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Pose Stream</title>
</head>
<body>
  <h1>Pose Stream</h1>
  <form action="/video_feed" method="post" enctype="multipart/form-data">
    <input type="file" name="video" accept="video/*">
    <input type="submit" value="Upload">
  </form>
</body>
</html>
"#;

/// GET /
///
/// Upload form posting the `video` field to `/video_feed`.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
