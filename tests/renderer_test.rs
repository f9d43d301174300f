use gecko::bindings::VariableBinding;
use gecko::error::Error;
use gecko::renderer::{MiniJinjaRenderer, TemplateRenderer};

#[test]
fn test_minijinja_renderer() {
    let engine = MiniJinjaRenderer::new();
    let mut bindings = VariableBinding::new("demo");
    bindings.insert("Author", "Gavin");

    let result = engine.render("a.txt", b"Hello {{ ProjectName }}!", &bindings).unwrap();
    assert_eq!(result, b"Hello demo!");

    let result = engine.render("b.txt", b"By {{Author}} for {{ ProjectName }}", &bindings).unwrap();
    assert_eq!(result, b"By Gavin for demo");
}

#[test]
fn test_no_placeholders_is_identity() {
    let engine = MiniJinjaRenderer::new();
    let bindings = VariableBinding::new("demo");
    let samples: [&[u8]; 4] = [
        b"",
        b"\n",
        b"fmt = \"%(asctime)s | %(levelname)-8s\"\nreturn f\"{color}{message}{self.RESET}\"\n\n",
        "通过关键字获取对应的值\r\n  trailing spaces   \n".as_bytes(),
    ];

    for content in samples {
        assert_eq!(engine.render("x.py", content, &bindings).unwrap(), content);
    }
}

#[test]
fn test_binary_passthrough() {
    let engine = MiniJinjaRenderer::new();
    let content = [0x89, b'P', b'N', b'G', 0xff, b'{', b'{', b' ', b'x'];
    let result = engine.render("logo.png", &content, &VariableBinding::new("demo")).unwrap();
    assert_eq!(result, content);
}

#[test]
fn test_malformed_placeholder_names_file() {
    let engine = MiniJinjaRenderer::new();
    let result = engine.render("core/conf.py", b"x = {{ ProjectName", &VariableBinding::new("demo"));

    match result {
        Err(Error::TemplateSyntaxError { path, .. }) => assert_eq!(path, "core/conf.py"),
        other => panic!("Expected TemplateSyntaxError, got {other:?}"),
    }
}

#[test]
fn test_unbound_placeholder_is_an_error() {
    let engine = MiniJinjaRenderer::new();
    let result = engine.render("README.md", b"{{ Missing }}", &VariableBinding::new("demo"));
    assert!(matches!(result, Err(Error::TemplateSyntaxError { .. })));
}
