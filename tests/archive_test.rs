use gecko::bindings::VariableBinding;
use gecko::error::Error;
use gecko::loader::archive::{extract_archive, fetch_archive};
use gecko::loader::{Resolver, TemplateSelector};
use gecko::processor::materialize;
use gecko::renderer::MiniJinjaRenderer;
use std::fs;
use std::io::{BufRead, BufReader, Cursor, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Builds an in-memory zip shaped like a code host snapshot.
fn snapshot(entries: &[(&str, Option<&str>)]) -> Cursor<Vec<u8>> {
    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        let options = SimpleFileOptions::default();
        for (name, content) in entries {
            match content {
                Some(content) => {
                    zip.start_file(*name, options).unwrap();
                    zip.write_all(content.as_bytes()).unwrap();
                }
                None => zip.add_directory(*name, options).unwrap(),
            }
        }
        zip.finish().unwrap();
    }
    Cursor::new(buffer)
}

/// Answers a single HTTP request on the loopback interface.
///
/// Returns the base URL to use as archive host and a handle yielding the
/// request line that was received.
fn serve_once(status: &'static str, body: Vec<u8>) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let host = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();
        loop {
            let mut header = String::new();
            reader.read_line(&mut header).unwrap();
            if header == "\r\n" || header.is_empty() {
                break;
            }
        }

        write!(
            stream,
            "HTTP/1.1 {status}\r\nContent-Type: application/zip\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        )
        .unwrap();
        stream.write_all(&body).unwrap();
        stream.flush().unwrap();
        request_line.trim_end().to_string()
    });

    (host, handle)
}

#[test]
fn test_extract_strips_top_level_folder() {
    let dest = TempDir::new().unwrap();
    let archive = snapshot(&[
        ("repo-main/", None),
        ("repo-main/a/", None),
        ("repo-main/a/b.txt", Some("nested")),
        ("repo-main/c.txt", Some("top")),
    ]);

    let extracted = extract_archive(archive, dest.path()).unwrap();

    assert_eq!(
        extracted,
        vec![PathBuf::from("a"), PathBuf::from("a/b.txt"), PathBuf::from("c.txt")]
    );
    assert_eq!(fs::read_to_string(dest.path().join("a/b.txt")).unwrap(), "nested");
    assert_eq!(fs::read_to_string(dest.path().join("c.txt")).unwrap(), "top");
    assert!(!dest.path().join("repo-main").exists());
}

#[test]
fn test_extract_creates_missing_parents() {
    let dest = TempDir::new().unwrap();
    let target = dest.path().join("out");
    let archive = snapshot(&[("repo-main/deep/er/file.py", Some("x = 1\n"))]);

    extract_archive(archive, &target).unwrap();

    assert_eq!(fs::read_to_string(target.join("deep/er/file.py")).unwrap(), "x = 1\n");
}

#[test]
fn test_extract_rejects_garbage() {
    let dest = TempDir::new().unwrap();
    let result = extract_archive(Cursor::new(b"not a zip".to_vec()), dest.path());
    assert!(matches!(result, Err(Error::ExtractFailed { .. })));
}

#[test]
fn test_fetch_archive_refuses_existing_destination() {
    let dest = TempDir::new().unwrap();
    let result = fetch_archive("user/repo", dest.path(), "https://github.com");
    assert!(matches!(result, Err(Error::DestinationExists { .. })));
}

#[test]
fn test_fetch_archive_rejects_invalid_source() {
    let dest = TempDir::new().unwrap();
    let result = fetch_archive("not/a/repo", dest.path().join("t"), "https://github.com");
    assert!(matches!(result, Err(Error::InvalidRemote { .. })));
}

#[test]
fn test_fetch_archive_download_failure() {
    let dest = TempDir::new().unwrap();
    let target = dest.path().join("t");

    // Nothing listens on the discard port of the loopback interface.
    let result = fetch_archive("user/repo", &target, "http://127.0.0.1:9");

    assert!(matches!(result, Err(Error::DownloadFailed { url, .. })
        if url == "http://127.0.0.1:9/user/repo/archive/HEAD.zip"));
    assert!(!target.exists());
}

#[test]
fn test_fetch_archive_http_error_status() {
    let dest = TempDir::new().unwrap();
    let target = dest.path().join("t");
    let (host, server) = serve_once("404 Not Found", b"missing".to_vec());

    let result = fetch_archive("user/repo", &target, &host);

    assert!(matches!(result, Err(Error::DownloadFailed { reason, .. })
        if reason.starts_with("HTTP 404")));
    assert!(!target.exists());
    assert_eq!(server.join().unwrap(), "GET /user/repo/archive/HEAD.zip HTTP/1.1");
}

#[test_log::test]
fn test_archive_template_end_to_end() {
    let archive = snapshot(&[
        ("repo-main/", None),
        ("repo-main/README.md", Some("# {{ ProjectName }}\n")),
        ("repo-main/core/", None),
        ("repo-main/core/conf.py", Some("project = '{{ ProjectName }}'\n")),
    ]);
    let (host, server) = serve_once("200 OK", archive.into_inner());

    let workspace = TempDir::new().unwrap();
    let resolver = Resolver::new(workspace.path()).with_archive_host(&host);
    let selector = resolver.parse("gh@user/repo");
    assert_eq!(selector, TemplateSelector::RemoteArchive("user/repo".to_string()));

    let tree = resolver.resolve(selector).unwrap();
    let dest = workspace.path().join("demo");
    let written =
        materialize(tree, &dest, &VariableBinding::new("demo"), &MiniJinjaRenderer::new()).unwrap();

    assert_eq!(server.join().unwrap(), "GET /user/repo/archive/HEAD.zip HTTP/1.1");
    assert_eq!(written, vec![PathBuf::from("README.md"), PathBuf::from("core/conf.py")]);
    assert_eq!(fs::read_to_string(dest.join("README.md")).unwrap(), "# demo\n");
    assert_eq!(fs::read_to_string(dest.join("core/conf.py")).unwrap(), "project = 'demo'\n");
    assert!(!dest.join("repo-main").exists());
}
