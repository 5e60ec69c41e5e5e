//! Integration tests for the inline rendering pipeline
//!
//! Covers rendering, context layering, line remapping, file-backed templates
//! and loader chain growth through the public API only.

use std::fs;

use inline_render::prelude::*;
use serde_json::json;

fn ctx(value: serde_json::Value) -> Context {
    Context::from_serialize(value).expect("context must be a map")
}

#[test]
fn renders_valid_template_verbatim() {
    let renderer = Renderer::default();
    let out = renderer
        .render(
            "<h1>{{ title }}</h1>\n{% if items %}{{ items | join(', ') }}{% endif %}",
            "page",
            &ctx(json!({ "title": "Inventory", "items": ["bolts", "nuts"] })),
        )
        .unwrap();
    assert_eq!(out, "<h1>Inventory</h1>\nbolts, nuts");
}

#[test]
fn display_writes_exact_output() {
    let renderer = Renderer::default();
    let mut sink = Vec::new();
    renderer
        .display_to(&mut sink, "Hello {{ name }}", "greet", &ctx(json!({ "name": "World" })))
        .unwrap();
    assert_eq!(sink, b"Hello World");
}

#[test]
fn default_only_variable() {
    let renderer = Renderer::default();
    renderer.set_default_context(ctx(json!({ "site": "Acme" })));
    assert_eq!(renderer.render("{{ site }}", "t1", &Context::new()).unwrap(), "Acme");
}

#[test]
fn context_precedence() {
    let renderer = Renderer::default();
    renderer.set_default_context(ctx(json!({ "shared": "default", "only_default": "d" })));

    let out = renderer
        .render(
            "{{ shared }} {{ only_default }} {{ only_call }}",
            "precedence",
            &ctx(json!({ "shared": "call", "only_call": "c" })),
        )
        .unwrap();
    assert_eq!(out, "call d c");
}

#[test]
fn syntax_error_line_follows_call_site() {
    let renderer = Renderer::default();
    let context = ctx(json!({ "a": 1, "b": 2 }));
    let source = "line one\nline two\n{% if %}\nline four";

    let (call_line, result) = (line!(), renderer.render(source, "remapped", &context));

    let err = result.unwrap_err();
    let syntax = err.as_syntax().expect("expected a syntax error");
    assert!(syntax.source_path().is_none());
    // call line - offset - context entries - source lines + relative line
    let expected = i64::from(call_line) - 3 - 2 - 4 + 3;
    assert_eq!(syntax.template_line(), Some(expected));
    assert!(err.to_string().contains(&format!("at line {expected}")));
}

#[test]
fn custom_offset_changes_remap() {
    let mut settings = RenderSettings::default();
    settings.remap.arg_lines_offset = 0;
    settings.remap.count_context_entries = false;
    let renderer = Renderer::new(settings);

    let (call_line, result) = (line!(), renderer.render("{{ }}", "offset", &ctx(json!({ "x": 1 }))));

    let err = result.unwrap_err();
    assert_eq!(
        err.as_syntax().and_then(TemplateSyntaxError::template_line),
        Some(i64::from(call_line))
    );
}

#[test]
fn literal_opening_on_call_line_reports_above_failure() {
    let renderer = Renderer::default();
    let context = Context::new();

    let (call_line, result) = (line!(), renderer.render(r#"
first
{% if %}
"#, "literal-layout", &context));

    let failing_line = i64::from(call_line) + 2;
    let err = result.unwrap_err();
    let reported = err
        .as_syntax()
        .and_then(TemplateSyntaxError::template_line)
        .expect("syntax error with a line");
    // offset + context entries + source lines - 1
    assert_eq!(failing_line - reported, 3 + 4 - 1);
}

#[test]
fn file_backed_syntax_error_keeps_line() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("layout.html"), "<html>\n<body>\n{{ }}\n</body>").unwrap();

    let renderer = Renderer::default();
    renderer.engine().add_directory(dir.path());

    let err = renderer
        .render("{% include 'layout.html' %}", "uses-layout", &Context::new())
        .unwrap_err();
    let syntax = err.as_syntax().expect("expected a syntax error");
    assert_eq!(syntax.name(), "layout.html");
    assert!(syntax.source_path().is_some());
    assert_eq!(syntax.template_line(), Some(3));
}

#[test]
fn runtime_errors_pass_through() {
    let renderer = Renderer::default();
    let err = renderer
        .render("{% include 'nowhere.html' %}", "missing-include", &Context::new())
        .unwrap_err();
    match err {
        RenderError::Runtime(inner) => {
            assert_eq!(inner.kind(), minijinja::ErrorKind::TemplateNotFound);
        }
        other => panic!("expected runtime error, got {other:?}"),
    }
}

#[test]
fn engine_is_built_once_and_shared() {
    let renderer = Renderer::default();
    let first = renderer.engine();
    renderer.render("x", "one", &Context::new()).unwrap();
    let second = renderer.ensure_engine();

    assert!(std::ptr::eq(first, second));
    assert!(second.loader().contains("one"));
}

#[test]
fn custom_filters_on_shared_engine() {
    let renderer = Renderer::default();
    renderer.engine().with_environment_mut(|env| {
        env.add_filter("money", |cents: i64| format!("${}.{:02}", cents / 100, cents % 100));
    });

    let out = renderer
        .render("{{ price | money }}", "price", &ctx(json!({ "price": 1999 })))
        .unwrap();
    assert_eq!(out, "$19.99");
}

#[test]
fn loader_chain_grows_without_eviction() {
    let renderer = Renderer::default();
    for i in 0..100 {
        let out = renderer
            .render("#{{ n }}", &format!("tpl-{i}"), &ctx(json!({ "n": i })))
            .unwrap();
        assert_eq!(out, format!("#{i}"));
    }

    let loader = renderer.engine().loader();
    assert_eq!(loader.len(), 100);
    assert_eq!(loader.ids().len(), 100);
    for i in 0..100 {
        let id = format!("tpl-{i}");
        assert!(loader.contains(&id), "{id} was evicted");
        assert_eq!(loader.load(&id).unwrap().as_deref(), Some("#{{ n }}"));
        assert_eq!(
            renderer.engine().render(&id, &ctx(json!({ "n": "again" }))).unwrap(),
            "#again"
        );
    }
}
