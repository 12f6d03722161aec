//! File backend tests
//! Tests catalog listing, cover lookup, and track prefix resolution on disk

use annil_backend::{FileBackend, COVER_FILE_NAME};
use annil_core::{AnnilError, AudioType, Backend};
use std::fs;
use tempfile::TempDir;
use tokio::io::AsyncReadExt;

/// Library with one catalog holding a cover and two tracks
fn create_library() -> TempDir {
    let root = TempDir::new().unwrap();
    let album = root.path().join("album-1");
    fs::create_dir(&album).unwrap();
    fs::write(album.join(COVER_FILE_NAME), b"jpeg bytes").unwrap();
    fs::write(album.join("07 - Song.flac"), b"flac bytes").unwrap();
    fs::write(album.join("12 - Other.mp3"), b"mp3 bytes").unwrap();
    fs::write(album.join("13 - Mystery"), b"raw bytes").unwrap();
    fs::create_dir(root.path().join("album-2")).unwrap();
    fs::write(root.path().join("stray-file.txt"), b"not a catalog").unwrap();
    root
}

async fn read_all(mut stream: annil_core::ContentStream) -> Vec<u8> {
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.unwrap();
    buf
}

#[tokio::test]
async fn test_new_requires_directory() {
    let root = create_library();

    assert!(FileBackend::new(root.path()).await.is_ok());
    assert!(FileBackend::new(root.path().join("stray-file.txt")).await.is_err());
    assert!(FileBackend::new(root.path().join("missing")).await.is_err());
}

#[tokio::test]
async fn test_list_catalogs_returns_directories() {
    let root = create_library();
    let backend = FileBackend::new(root.path()).await.unwrap();

    let mut catalogs = backend.list_catalogs().await;
    catalogs.sort();
    assert_eq!(catalogs, vec!["album-1", "album-2"]);
}

#[tokio::test]
async fn test_list_catalogs_unreadable_root_is_empty() {
    let root = create_library();
    let backend = FileBackend::new(root.path()).await.unwrap();
    let path = root.path().to_path_buf();
    drop(root);

    assert!(!path.exists());
    assert!(backend.list_catalogs().await.is_empty());
}

#[tokio::test]
async fn test_get_cover() {
    let root = create_library();
    let backend = FileBackend::new(root.path()).await.unwrap();

    let cover = backend.get_cover("album-1").await.unwrap();
    assert_eq!(read_all(cover).await, b"jpeg bytes");

    let missing = backend.get_cover("album-2").await;
    assert!(matches!(missing, Err(AnnilError::NotFound { .. })));
}

#[tokio::test]
async fn test_track_seven_resolves_to_flac() {
    let root = create_library();
    let backend = FileBackend::new(root.path()).await.unwrap();

    let (audio_type, stream) = backend.get_audio("album-1", 7).await.unwrap();
    assert_eq!(audio_type, AudioType::Flac);
    assert_eq!(read_all(stream).await, b"flac bytes");
}

#[tokio::test]
async fn test_audio_type_from_extension() {
    let root = create_library();
    let backend = FileBackend::new(root.path()).await.unwrap();

    let (mp3, _) = backend.get_audio("album-1", 12).await.unwrap();
    assert_eq!(mp3, AudioType::Mp3);

    // No extension is not an error
    let (unknown, stream) = backend.get_audio("album-1", 13).await.unwrap();
    assert_eq!(unknown, AudioType::Unknown);
    assert_eq!(read_all(stream).await, b"raw bytes");
}

#[tokio::test]
async fn test_missing_track_not_found() {
    let root = create_library();
    let backend = FileBackend::new(root.path()).await.unwrap();

    assert!(matches!(
        backend.get_audio("album-1", 8).await,
        Err(AnnilError::NotFound { .. })
    ));
    assert!(matches!(
        backend.get_audio("no-such-album", 7).await,
        Err(AnnilError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_duplicate_prefix_last_match_wins() {
    let root = TempDir::new().unwrap();
    let album = root.path().join("dupes");
    fs::create_dir(&album).unwrap();
    fs::write(album.join("03 - First.mp3"), b"first").unwrap();
    fs::write(album.join("03 - Second.flac"), b"second").unwrap();
    fs::write(album.join("03 - Between.mp3"), b"between").unwrap();

    let backend = FileBackend::new(root.path()).await.unwrap();

    // Repeat to make sure the choice does not depend on directory order
    for _ in 0..5 {
        let (audio_type, stream) = backend.get_audio("dupes", 3).await.unwrap();
        assert_eq!(audio_type, AudioType::Flac);
        assert_eq!(read_all(stream).await, b"second");
    }
}

#[tokio::test]
async fn test_directory_with_track_prefix_ignored() {
    let root = TempDir::new().unwrap();
    let album = root.path().join("album");
    fs::create_dir_all(album.join("05 - bonus")).unwrap();

    let backend = FileBackend::new(root.path()).await.unwrap();
    assert!(matches!(
        backend.get_audio("album", 5).await,
        Err(AnnilError::NotFound { .. })
    ));
}
