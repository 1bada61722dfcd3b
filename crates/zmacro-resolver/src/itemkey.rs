//! Item key parameters: `key[p1,"p 2",[a,b]]`.

/// Parameters of an item key, unquoted. Arrays are returned as written.
/// A key without brackets has no parameters; `key[]` has one empty one.
pub fn parameters(key: &str) -> Vec<String> {
    let Some(open) = key.find('[') else {
        return Vec::new();
    };
    let Some(body) = key[open + 1..].strip_suffix(']') else {
        return Vec::new();
    };

    let mut params = Vec::new();
    let mut chars = body.chars().peekable();
    loop {
        while chars.next_if_eq(&' ').is_some() {}

        let mut param = String::new();
        match chars.peek() {
            Some('"') => {
                chars.next();
                while let Some(ch) = chars.next() {
                    match ch {
                        '\\' if chars.peek() == Some(&'"') => {
                            chars.next();
                            param.push('"');
                        }
                        '"' => break,
                        _ => param.push(ch),
                    }
                }
                while chars.next_if(|c| *c != ',').is_some() {}
            }
            Some('[') => {
                let mut depth = 0usize;
                let mut quoted = false;
                while let Some(ch) = chars.next_if(|c| quoted || depth > 0 || *c != ',') {
                    match ch {
                        '"' => quoted = !quoted,
                        '\\' if quoted => {
                            param.push(ch);
                            if let Some(next) = chars.next() {
                                param.push(next);
                            }
                            continue;
                        }
                        '[' if !quoted => depth += 1,
                        ']' if !quoted => depth = depth.saturating_sub(1),
                        _ => {}
                    }
                    param.push(ch);
                }
                trim_trailing_spaces(&mut param);
            }
            _ => {
                while let Some(ch) = chars.next_if(|c| *c != ',') {
                    param.push(ch);
                }
                trim_trailing_spaces(&mut param);
            }
        }
        params.push(param);

        if chars.next().is_none() {
            break;
        }
    }
    params
}

/// Spaces before a separator are not part of an unquoted parameter.
fn trim_trailing_spaces(param: &mut String) {
    param.truncate(param.trim_end_matches(' ').len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_parameters() {
        assert_eq!(parameters("net.if.in[eth0,bytes]"), vec!["eth0", "bytes"]);
        assert_eq!(parameters("agent.ping"), Vec::<String>::new());
        assert_eq!(parameters("key[]"), vec![""]);
        assert_eq!(parameters("key[a,,c]"), vec!["a", "", "c"]);
    }

    #[test]
    fn test_quoted_parameters() {
        assert_eq!(
            parameters(r#"vfs.fs.size["/var, log",pfree]"#),
            vec!["/var, log", "pfree"]
        );
        assert_eq!(parameters(r#"k["say \"hi\""]"#), vec!["say \"hi\""]);
        assert_eq!(parameters(r#"k[ "x" , y]"#), vec!["x", "y"]);
    }

    #[test]
    fn test_array_parameter_kept_whole() {
        assert_eq!(parameters("k[[a,b],c]"), vec!["[a,b]", "c"]);
        assert_eq!(parameters("k[[a,b] ,c]"), vec!["[a,b]", "c"]);
    }

    #[test]
    fn test_spaces_around_unquoted_parameters_dropped() {
        assert_eq!(parameters("k[a ,b]"), vec!["a", "b"]);
        assert_eq!(parameters("k[ a b  ,  c ]"), vec!["a b", "c"]);
        assert_eq!(parameters(r#"k["a " ,b]"#), vec!["a ", "b"]);
    }
}
