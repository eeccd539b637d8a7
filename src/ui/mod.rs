//! HTML templates and static assets, embedded in the binary

use axum::response::Html;
use minijinja::{Environment, Value};
use rust_embed::RustEmbed;
use std::collections::BTreeMap;

use crate::auth::RequestContext;
use crate::error::Result;

#[derive(RustEmbed)]
#[folder = "templates/"]
struct TemplateFiles;

#[derive(RustEmbed)]
#[folder = "static/"]
struct StaticFiles;

/// Template environment shared by all handlers
#[derive(Clone)]
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_loader(|name| {
            Ok(TemplateFiles::get(name).map(|file| String::from_utf8_lossy(&file.data).into_owned()))
        });
        Self { env }
    }

    /// Render a page. Every page sees `user` and the flashed `messages`
    /// on top of its own `vars`.
    pub fn render(
        &self,
        name: &str,
        ctx: &RequestContext,
        messages: &[String],
        vars: &[(&str, Value)],
    ) -> Result<Html<String>> {
        let template = self.env.get_template(name)?;

        let mut page: BTreeMap<&str, Value> = vars.iter().cloned().collect();
        page.insert("user", Value::from_serialize(ctx.user.as_ref()));
        page.insert("messages", Value::from_serialize(messages));

        Ok(Html(template.render(page)?))
    }
}

impl Default for Templates {
    fn default() -> Self {
        Self::new()
    }
}

/// Look up an embedded static file, returning its content type and bytes
pub fn asset(path: &str) -> Option<(&'static str, Vec<u8>)> {
    let file = StaticFiles::get(path)?;
    let content_type = match path.rsplit_once('.').map(|(_, ext)| ext) {
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    };
    Some((content_type, file.data.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_templates_load() {
        let templates = Templates::new();
        for name in [
            "base.html",
            "auth/register.html",
            "auth/login.html",
            "blog/index.html",
            "blog/detail.html",
            "blog/create.html",
            "blog/update.html",
        ] {
            assert!(templates.env.get_template(name).is_ok(), "{} failed to load", name);
        }
    }

    #[test]
    fn test_unknown_template_is_an_error() {
        assert!(Templates::new().env.get_template("missing.html").is_err());
    }

    #[test]
    fn test_stylesheet_is_embedded() {
        let (content_type, body) = asset("style.css").expect("style.css embedded");
        assert_eq!(content_type, "text/css; charset=utf-8");
        assert!(!body.is_empty());
        assert!(asset("nope.css").is_none());
    }
}
