//! Turns uploaded files plus an optional external video descriptor into the
//! media list a question stores.

use bytes::Bytes;
use mime::Mime;

use crate::error::Error;
use crate::models::question::{MediaInsert, MediaType, VideoInput};
use crate::uploader::MediaUploader;

pub struct FilePart {
    pub filename: String,
    pub content_type: Mime,
    pub content: Bytes,
}

/// The whole batch is checked before the first upload call goes out, so a
/// rejected batch never reaches the image host.
pub async fn collect_media<U>(uploader: &U, files: Vec<FilePart>, video: Option<VideoInput>) -> Result<Vec<MediaInsert>, Error>
where
    U: MediaUploader,
{
    if files.iter().any(|file| file.content_type.type_() != mime::IMAGE) {
        return Err(Error::UnsupportedMedia);
    }
    let mut items = Vec::with_capacity(files.len() + 1);
    for file in files {
        let url = uploader.upload_image(&file.filename, file.content).await?;
        items.push(MediaInsert {
            type_: MediaType::Image,
            url,
            start_time: None,
            duration: None,
        });
    }
    if let Some(video) = video {
        items.push(MediaInsert {
            type_: MediaType::Video,
            url: video.url,
            start_time: video.start_time,
            duration: video.duration,
        });
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct FakeUploader {
        calls: Cell<usize>,
    }

    impl MediaUploader for FakeUploader {
        async fn upload_image(&self, filename: &str, _content: Bytes) -> Result<String, Error> {
            self.calls.set(self.calls.get() + 1);
            Ok(format!("https://img.example/{filename}"))
        }
    }

    fn file(filename: &str, content_type: Mime) -> FilePart {
        FilePart {
            filename: filename.into(),
            content_type,
            content: Bytes::from_static(b"\x89PNG"),
        }
    }

    #[tokio::test]
    async fn non_image_in_the_batch_aborts_before_any_upload() {
        let uploader = FakeUploader::default();
        let files = vec![
            file("cover.png", mime::IMAGE_PNG),
            file("notes.pdf", mime::APPLICATION_PDF),
        ];
        let err = collect_media(&uploader, files, None).await.unwrap_err();
        assert!(matches!(err, Error::UnsupportedMedia));
        assert_eq!(uploader.calls.get(), 0);
    }

    #[tokio::test]
    async fn images_upload_in_order_and_video_comes_last() {
        let uploader = FakeUploader::default();
        let files = vec![file("one.png", mime::IMAGE_PNG), file("two.jpg", mime::IMAGE_JPEG)];
        let video = VideoInput {
            url: "https://videos.example/clip".into(),
            start_time: Some(12.0),
            duration: Some(30.0),
        };
        let items = collect_media(&uploader, files, Some(video)).await.unwrap();
        assert_eq!(uploader.calls.get(), 2);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].url, "https://img.example/one.png");
        assert_eq!(items[0].type_, MediaType::Image);
        assert_eq!(items[2].type_, MediaType::Video);
        assert_eq!(items[2].start_time, Some(12.0));
    }

    #[tokio::test]
    async fn video_alone_produces_a_single_item() {
        let uploader = FakeUploader::default();
        let video = VideoInput {
            url: "https://videos.example/clip".into(),
            start_time: None,
            duration: None,
        };
        let items = collect_media(&uploader, Vec::new(), Some(video)).await.unwrap();
        assert_eq!(uploader.calls.get(), 0);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].type_, MediaType::Video);
    }
}
