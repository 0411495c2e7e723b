//! URL inspection and query parameter editing.

use ::url::Url;
use serde::Serialize;

use super::{ToolError, ToolResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedUrl {
    pub scheme: String,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub path: String,
    pub fragment: Option<String>,
    /// Decoded query pairs in their original order
    pub params: Vec<(String, String)>,
}

pub fn parse(input: &str) -> ToolResult<ParsedUrl> {
    let url = parse_url(input)?;
    Ok(ParsedUrl {
        scheme: url.scheme().to_string(),
        host: url.host_str().map(str::to_string),
        port: url.port_or_known_default(),
        path: url.path().to_string(),
        fragment: url.fragment().map(str::to_string),
        params: url.query_pairs().into_owned().collect(),
    })
}

/// Set `key` to `value`, replacing every existing occurrence of `key`.
pub fn set_param(input: &str, key: &str, value: &str) -> ToolResult<String> {
    if key.is_empty() {
        return Err(ToolError::Url("parameter name must not be empty".to_string()));
    }
    let mut url = parse_url(input)?;
    let mut params: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    match params.iter().position(|(name, _)| name == key) {
        Some(index) => {
            params[index].1 = value.to_string();
            let mut seen = false;
            params.retain(|(name, _)| {
                if name != key {
                    return true;
                }
                let keep = !seen;
                seen = true;
                keep
            });
        }
        None => params.push((key.to_string(), value.to_string())),
    }
    write_params(&mut url, &params);
    Ok(url.into())
}

pub fn remove_param(input: &str, key: &str) -> ToolResult<String> {
    let mut url = parse_url(input)?;
    let params: Vec<(String, String)> = url
        .query_pairs()
        .into_owned()
        .filter(|(name, _)| name != key)
        .collect();
    write_params(&mut url, &params);
    Ok(url.into())
}

/// Rebuild a URL string from its parts.
pub fn build(parts: &ParsedUrl) -> ToolResult<String> {
    let host = parts.host.as_deref().unwrap_or_default();
    let mut url = parse_url(&format!("{}://{host}", parts.scheme))?;
    url.set_port(parts.port)
        .map_err(|()| ToolError::Url("URL cannot carry a port".to_string()))?;
    url.set_path(&parts.path);
    write_params(&mut url, &parts.params);
    url.set_fragment(parts.fragment.as_deref());
    Ok(url.into())
}

fn parse_url(input: &str) -> ToolResult<Url> {
    Url::parse(input.trim()).map_err(|error| ToolError::Url(error.to_string()))
}

fn write_params(url: &mut Url, params: &[(String, String)]) {
    if params.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(params);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_splits_components() {
        let parsed = parse("https://example.com:8443/a/b?x=1&y=hello%20world#top").unwrap();
        assert_eq!(parsed.scheme, "https");
        assert_eq!(parsed.host.as_deref(), Some("example.com"));
        assert_eq!(parsed.port, Some(8443));
        assert_eq!(parsed.path, "/a/b");
        assert_eq!(parsed.fragment.as_deref(), Some("top"));
        assert_eq!(
            parsed.params,
            vec![
                ("x".to_string(), "1".to_string()),
                ("y".to_string(), "hello world".to_string())
            ]
        );
    }

    #[test]
    fn default_port_is_reported() {
        assert_eq!(parse("http://example.com").unwrap().port, Some(80));
    }

    #[test]
    fn set_and_remove_params() {
        let url = set_param("https://example.com/?a=1&b=2&a=3", "a", "9").unwrap();
        assert_eq!(url, "https://example.com/?a=9&b=2");

        let url = set_param(&url, "c", "x y").unwrap();
        assert_eq!(url, "https://example.com/?a=9&b=2&c=x+y");

        let url = remove_param(&url, "b").unwrap();
        assert_eq!(url, "https://example.com/?a=9&c=x+y");

        let url = remove_param(&remove_param(&url, "a").unwrap(), "c").unwrap();
        assert_eq!(url, "https://example.com/");
    }

    #[test]
    fn build_reassembles_parsed_parts() {
        let original = "https://example.com:8443/search?q=rust&page=2#results";
        let rebuilt = build(&parse(original).unwrap()).unwrap();
        assert_eq!(parse(&rebuilt).unwrap(), parse(original).unwrap());
    }

    #[test]
    fn invalid_url_is_an_error() {
        assert!(matches!(parse("not a url"), Err(ToolError::Url(_))));
        assert!(set_param("https://example.com", "", "v").is_err());
    }
}
