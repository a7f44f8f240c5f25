use super::*;

fn png(len: usize) -> ImageFile {
    ImageFile::new("cat.png", "image/png", vec![0_u8; len])
}

#[test]
fn accepts_every_allowed_type() {
    for mime in ["image/jpeg", "image/jpg", "image/png", "image/gif", "image/webp", "IMAGE/PNG"] {
        let file = ImageFile::new("f", mime, vec![1, 2, 3]);
        assert_eq!(validate_image(&file), Ok(()), "expected {mime} to be accepted");
    }
}

#[test]
fn rejects_non_image_type() {
    let file = ImageFile::new("notes.pdf", "application/pdf", vec![1]);
    assert_eq!(validate_image(&file), Err(INVALID_TYPE_MESSAGE));
}

#[test]
fn size_limit_is_inclusive_at_five_mib() {
    assert_eq!(validate_image(&png(MAX_IMAGE_BYTES)), Ok(()));
    assert_eq!(validate_image(&png(MAX_IMAGE_BYTES + 1)), Err(TOO_LARGE_MESSAGE));
}

#[test]
fn six_megabyte_file_is_rejected_and_previous_preview_kept() {
    let mut slot = ImageSlot::default();
    slot.select(png(1024)).unwrap();
    let before = slot.clone();

    let err = slot.select(png(6 * 1024 * 1024)).unwrap_err();
    assert_eq!(err, TOO_LARGE_MESSAGE);
    assert_eq!(slot, before);
    assert_eq!(slot.pending().unwrap().size(), 1024);
}

#[test]
fn rejected_type_keeps_remote_preview() {
    let mut slot = ImageSlot::with_remote(Some("/uploads/a.png"));
    let err = slot.select(ImageFile::new("a.txt", "text/plain", vec![1])).unwrap_err();
    assert_eq!(err, INVALID_TYPE_MESSAGE);
    assert_eq!(slot.preview(), Some(&ImagePreview::Remote("/uploads/a.png".to_owned())));
    assert!(slot.pending().is_none());
}

#[test]
fn select_replaces_preview_with_local_file() {
    let mut slot = ImageSlot::with_remote(Some("/uploads/old.png"));
    slot.select(png(10)).unwrap();
    assert_eq!(
        slot.preview(),
        Some(&ImagePreview::Local { file_name: "cat.png".to_owned(), mime_type: "image/png".to_owned(), size: 10 })
    );
}

#[test]
fn clear_restores_fallback() {
    let mut slot = ImageSlot::default();
    slot.select(png(10)).unwrap();
    slot.clear(Some("/uploads/old.png"));
    assert!(slot.pending().is_none());
    assert_eq!(slot.preview(), Some(&ImagePreview::Remote("/uploads/old.png".to_owned())));
}

#[test]
fn mime_from_path_maps_known_extensions() {
    assert_eq!(mime_from_path(Path::new("a.JPG")), "image/jpeg");
    assert_eq!(mime_from_path(Path::new("a.webp")), "image/webp");
    assert_eq!(mime_from_path(Path::new("a")), "application/octet-stream");
}

#[test]
fn from_path_reads_bytes_and_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pic.gif");
    std::fs::write(&path, b"GIF89a").unwrap();
    let file = ImageFile::from_path(&path).unwrap();
    assert_eq!(file.file_name, "pic.gif");
    assert_eq!(file.mime_type, "image/gif");
    assert_eq!(file.bytes, b"GIF89a");
}
