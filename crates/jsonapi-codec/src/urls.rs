//! Query-string helpers for building navigation links.
//!
//! Only the targeted parameter is rewritten; every other parameter keeps its
//! original spelling and position.

/// Returns `url` with `key` set to `value`.
///
/// Existing occurrences of `key` (compared after percent-decoding) are
/// collapsed into one at the position of the first; a missing key is
/// appended.
pub fn replace_query_param(url: &str, key: &str, value: &str) -> String {
    let (base, query, fragment) = split_url(url);
    let mut pairs = Vec::new();
    let mut replaced = false;
    for raw in query.split('&').filter(|raw| !raw.is_empty()) {
        let raw_key = raw.split_once('=').map_or(raw, |(k, _)| k);
        if percent_decode(raw_key) == key {
            if !replaced {
                pairs.push(format!("{}={}", raw_key, value));
                replaced = true;
            }
            continue;
        }
        pairs.push(raw.to_string());
    }
    if !replaced {
        pairs.push(format!("{}={}", key, value));
    }
    join_url(base, &pairs, fragment)
}

/// Returns `url` without any occurrence of `key`.
pub fn remove_query_param(url: &str, key: &str) -> String {
    let (base, query, fragment) = split_url(url);
    let pairs: Vec<String> = query
        .split('&')
        .filter(|raw| !raw.is_empty())
        .filter(|raw| {
            let raw_key = raw.split_once('=').map_or(*raw, |(k, _)| k);
            percent_decode(raw_key) != key
        })
        .map(str::to_string)
        .collect();
    join_url(base, &pairs, fragment)
}

/// Query string of `url`, without the leading `?` or any fragment.
pub fn query_of(url: &str) -> &str {
    split_url(url).1
}

/// Decodes `application/x-www-form-urlencoded` text: `+` is a space and
/// `%XX` a byte. Malformed escapes are kept literally.
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                match (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push(hi << 4 | lo);
                        i += 2;
                    }
                    _ => out.push(b'%'),
                }
            }
            byte => out.push(byte),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

fn split_url(url: &str) -> (&str, &str, Option<&str>) {
    let (rest, fragment) = match url.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (url, None),
    };
    match rest.split_once('?') {
        Some((base, query)) => (base, query, fragment),
        None => (rest, "", fragment),
    }
}

fn join_url(base: &str, pairs: &[String], fragment: Option<&str>) -> String {
    let mut url = base.to_string();
    if !pairs.is_empty() {
        url.push('?');
        url.push_str(&pairs.join("&"));
    }
    if let Some(fragment) = fragment {
        url.push('#');
        url.push_str(fragment);
    }
    url
}
