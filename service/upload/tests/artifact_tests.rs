mod common;

use common::{hash, name, Store};
use domain_upload::{
    exception::UploadException,
    model::vo::StoredFile,
    service::{AliasService, ArtifactService},
};
use tokio::io::AsyncReadExt;

#[tokio::test]
async fn list_reports_every_alias() {
    let store = Store::new();
    assert!(store.artifact.list().await.unwrap().is_empty());

    store.upload(&hash(2), "b.bin", &[b"two"]).await;
    store.upload(&hash(1), "a.bin", &[b"one"]).await;
    store.alias.link(&hash(1), &name("copy.bin")).await.unwrap();

    let listed = store.artifact.list().await.unwrap();
    let expected = [(1, "a.bin"), (1, "copy.bin"), (2, "b.bin")].map(|(n, file_name)| StoredFile {
        hash: hash(n),
        file_name: name(file_name),
    });
    assert_eq!(listed, expected);
}

#[tokio::test]
async fn fetching_an_alias_reads_the_canonical_artifact() {
    let store = Store::new();
    store.upload(&hash(1), "a.bin", &[b"stored ", b"once"]).await;
    store.alias.link(&hash(1), &name("b.bin")).await.unwrap();

    let mut artifact = store.artifact.fetch(&hash(1), &name("b.bin")).await.unwrap();
    let mut content = Vec::new();
    artifact.file.read_to_end(&mut content).await.unwrap();

    assert_eq!(content, b"stored once");
    assert_eq!(artifact.len, 11);
    assert_eq!(artifact.canonical, name("a.bin"));
    assert_eq!(artifact.download_name, name("b.bin"));
}

#[tokio::test]
async fn fetching_requires_a_registered_alias() {
    let store = Store::new();
    store.upload(&hash(1), "a.bin", &[b"x"]).await;

    assert!(matches!(
        store.artifact.fetch(&hash(1), &name("other.bin")).await,
        Err(UploadException::NotFound { .. })
    ));
    assert!(matches!(
        store.artifact.fetch(&hash(2), &name("a.bin")).await,
        Err(UploadException::NotFound { .. })
    ));
}

#[tokio::test]
async fn missing_artifact_is_not_found() {
    let store = Store::new();
    store.upload(&hash(1), "a.bin", &[b"x"]).await;
    std::fs::remove_file(store.path("a.bin")).unwrap();

    assert!(matches!(
        store.artifact.fetch(&hash(1), &name("a.bin")).await,
        Err(UploadException::NotFound { .. })
    ));
}
