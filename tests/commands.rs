use std::fs;
use std::path::Path;

use qrenc::commands::{execute, run_script};
use qrenc::{structured_file_names, CommandError, Error, ImageType, Session};

fn encode_line(text: &str, path: &Path) -> String {
    format!("qrencode::encode {{{}}} {{{}}}", text, path.display())
}

#[test]
fn test_script_writes_svg() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hello.svg");
    let script = format!(
        "# vector output\nqrencode::setfiletype svg\nqrencode::setlevel 1\nqrencode::setforeground 336699\n{}\n",
        encode_line("Hello, World!", &path)
    );
    let session = Session::new();
    assert_eq!(run_script(&session, &script).unwrap(), 4);

    let svg = fs::read_to_string(&path).unwrap();
    assert!(svg.starts_with("<?xml"));
    assert!(svg.contains("fill=\"#336699\""));
    assert!(svg.trim_end().ends_with("</svg>"));
}

#[test]
fn test_png_is_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("code.png");
    let session = Session::new();
    let written = session.encode("default settings", path.to_str().unwrap()).unwrap();
    assert_eq!(written, [path.clone()]);
    let bytes = fs::read(&path).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn test_ascii_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("code.txt");
    let session = Session::new();
    session.update(|settings| settings.set_file_type("ascii"));
    session.encode("HELLO", path.to_str().unwrap()).unwrap();

    // Version 1 is 21 modules wide, plus 4 modules of margin on each side.
    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 29);
    assert!(text.lines().all(|line| line.len() == 58));
    assert!(text.contains("##############"));
}

#[test]
fn test_minimum_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("code.txt");
    let session = Session::new();
    session.update(|settings| {
        settings.set_file_type("asciii");
        settings.set_version(5).unwrap();
    });
    session.encode("HELLO", path.to_str().unwrap()).unwrap();
    // Version 5 is 37 modules wide.
    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 37 + 8);
}

#[test]
fn test_structured_append() {
    let dir = tempfile::tempdir().unwrap();
    let outfile = dir.path().join("part.TXT");
    let outfile = outfile.to_str().unwrap();
    let session = Session::new();
    session.update(|settings| {
        settings.set_file_type("utf8");
        settings.set_version(1).unwrap();
        settings.set_structured(1);
    });
    let written = session
        .encode("the quick brown fox jumps over the lazy dog", outfile)
        .unwrap();

    assert!(written.len() > 1);
    let expected = structured_file_names(outfile, ImageType::Utf8.suffix(), written.len());
    for (path, name) in written.iter().zip(&expected) {
        assert_eq!(path.to_str(), Some(name.as_str()));
        assert!(path.exists());
        assert!(name.ends_with(".TXT"));
    }
    assert!(!Path::new(outfile).exists());
}

#[test]
fn test_script_writes_micro_symbol() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("m.txt");
    let script = format!(
        "qrencode::setmicro 1\nqrencode::setversion 2\nqrencode::setfiletype ascii\n{}\n",
        encode_line("12345", &path)
    );
    let session = Session::new();
    assert_eq!(run_script(&session, &script).unwrap(), 4);

    // M2 is 13 modules wide, with a quiet zone of 2 modules.
    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 17);
    assert!(text.lines().all(|line| line.len() == 34));
    assert!(text.lines().nth(2).unwrap().starts_with("    ##############"));
}

#[test]
fn test_structured_needs_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("part.png");
    let session = Session::new();
    session.update(|settings| settings.set_structured(1));
    let result = session.encode("data", path.to_str().unwrap());
    assert!(matches!(result, Err(Error::Encoding(_))));
}

#[test]
fn test_data_too_big() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("big.png");
    let session = Session::new();
    session.update(|settings| settings.set_level(3));
    let text = "x".repeat(1300);
    assert!(matches!(
        session.encode(&text, path.to_str().unwrap()),
        Err(Error::Encoding(_))
    ));
    assert!(!path.exists());
}

#[test]
fn test_unwritable_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("code.png");
    let session = Session::new();
    let error = session.encode("data", path.to_str().unwrap()).unwrap_err();
    assert!(matches!(error, Error::Write { .. }));
    assert!(error.to_string().contains("missing"));
}

#[test]
fn test_script_stops_at_first_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("never.png");
    let script = format!(
        "qrencode::setsize 4\nqrencode::setbackground nope\n{}\n",
        encode_line("text", &path)
    );
    let session = Session::new();
    let error = run_script(&session, &script).unwrap_err();
    assert!(matches!(error, CommandError::Script { line: 2, .. }));
    assert_eq!(session.settings().size(), 4);
    assert!(!path.exists());
}

#[test]
fn test_encode_arguments() {
    let session = Session::new();
    let error = execute(&session, &["qrencode::encode", "", "out.png"]).unwrap_err();
    assert!(matches!(error, CommandError::Session(Error::EmptyInput)));
    let error = execute(&session, &["qrencode::encode", "a", "b", "c"]).unwrap_err();
    assert!(matches!(error, CommandError::WrongArgs { .. }));
}

#[test]
fn test_concurrent_encodes() {
    let dir = tempfile::tempdir().unwrap();
    let session = Session::new();
    session.update(|settings| settings.set_file_type("xpm"));
    std::thread::scope(|scope| {
        for index in 0..4 {
            let session = &session;
            let path = dir.path().join(format!("code{index}.xpm"));
            scope.spawn(move || {
                session
                    .encode(format!("symbol {index}"), path.to_str().unwrap())
                    .unwrap();
            });
        }
    });
    for index in 0..4 {
        let text = fs::read_to_string(dir.path().join(format!("code{index}.xpm"))).unwrap();
        assert!(text.starts_with("/* XPM */"));
        assert!(text.ends_with("\"};\n"));
    }
}
