//! Secret acquisition: file, literal, interactive prompt, or generated.
//!
//! Priority is strict. A file path always wins and its failures are
//! reported, never silently skipped in favor of the literal; the
//! interactive prompt is only reached when neither file nor literal was
//! supplied, and a blank answer there means "generate one for me".

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use rand::{distributions::Alphanumeric, Rng};
use zeroize::Zeroizing;

use crate::error::{RespawnError, Result};

/// Cap on bytes read from a secret file.
pub const SECRET_FILE_MAX: usize = 255;

/// Interactive answers shorter than this are rejected and re-prompted.
pub const MIN_PROMPT_LEN: usize = 8;

const GENERATED_LEN: usize = 24;

/// Resolve the user's secret.
///
/// Order: `file` contents if a path was given (errors propagate), else
/// `literal` verbatim, else an interactive prompt, else a freshly generated
/// secret when the prompt answer is blank.
pub fn user_secret(file: Option<&Path>, literal: Option<&str>) -> Result<Zeroizing<String>> {
    if let Some(path) = file {
        return secret_from_file(path);
    }
    if let Some(s) = literal {
        return Ok(Zeroizing::new(s.to_string()));
    }
    match secret_from_prompt(|| {
        rpassword::prompt_password("Enter Secret (or press Enter to generate): ")
    })? {
        Some(secret) => Ok(secret),
        None => Ok(generate()),
    }
}

/// Generate a random alphanumeric secret from the OS RNG.
pub fn generate() -> Zeroizing<String> {
    let mut rng = rand::thread_rng();
    let secret: String = (0..GENERATED_LEN)
        .map(|_| rng.sample(Alphanumeric) as char)
        .collect();
    Zeroizing::new(secret)
}

fn secret_from_file(path: &Path) -> Result<Zeroizing<String>> {
    let named = |reason: String| RespawnError::SecretFile {
        path: path.to_path_buf(),
        reason,
    };

    let file = fs::File::open(path).map_err(|e| named(e.to_string()))?;
    let mut buf = Vec::with_capacity(SECRET_FILE_MAX);
    file.take(SECRET_FILE_MAX as u64)
        .read_to_end(&mut buf)
        .map_err(|e| named(e.to_string()))?;

    let mut secret =
        String::from_utf8(buf).map_err(|_| named("not valid UTF-8".to_string()))?;
    if secret.ends_with('\n') {
        secret.pop();
        if secret.ends_with('\r') {
            secret.pop();
        }
    }
    if secret.is_empty() {
        return Err(named("empty".to_string()));
    }
    Ok(Zeroizing::new(secret))
}

/// Prompt loop, generic over the line source so it is testable without a
/// terminal. `Ok(None)` means the user answered blank and wants a generated
/// secret.
fn secret_from_prompt<F>(mut read_line: F) -> Result<Option<Zeroizing<String>>>
where
    F: FnMut() -> io::Result<String>,
{
    loop {
        let answer = read_line()?;
        let answer = answer.trim_end_matches(['\r', '\n']);
        if answer.is_empty() {
            return Ok(None);
        }
        if answer.len() >= MIN_PROMPT_LEN {
            return Ok(Some(Zeroizing::new(answer.to_string())));
        }
        eprintln!("Too short.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_secret_file(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn file_beats_literal() {
        let f = write_secret_file(b"from-the-file\n");
        let secret = user_secret(Some(f.path()), Some("from-the-flag")).unwrap();
        assert_eq!(secret.as_str(), "from-the-file");
    }

    #[test]
    fn unreadable_file_errors_instead_of_falling_through() {
        let err = user_secret(Some(Path::new("/nonexistent/secret.txt")), Some("literal"))
            .unwrap_err();
        match err {
            RespawnError::SecretFile { path, .. } => {
                assert_eq!(path, Path::new("/nonexistent/secret.txt"));
            }
            other => panic!("expected SecretFile error, got {other}"),
        }
    }

    #[test]
    fn empty_file_errors() {
        let f = write_secret_file(b"\n");
        assert!(matches!(
            user_secret(Some(f.path()), None),
            Err(RespawnError::SecretFile { .. })
        ));
    }

    #[test]
    fn file_read_is_capped() {
        let long = vec![b'x'; 4096];
        let f = write_secret_file(&long);
        let secret = user_secret(Some(f.path()), None).unwrap();
        assert_eq!(secret.len(), SECRET_FILE_MAX);
    }

    #[test]
    fn literal_is_returned_verbatim() {
        let secret = user_secret(None, Some("hunter22")).unwrap();
        assert_eq!(secret.as_str(), "hunter22");
    }

    #[test]
    fn prompt_rejects_short_then_accepts() {
        let mut answers = vec!["short", "longenough"].into_iter();
        let secret = secret_from_prompt(|| Ok(answers.next().unwrap().to_string()))
            .unwrap()
            .expect("accepted answer");
        assert_eq!(secret.as_str(), "longenough");
    }

    #[test]
    fn prompt_blank_means_generate() {
        let result = secret_from_prompt(|| Ok(String::new())).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn prompt_strips_trailing_newline() {
        let secret = secret_from_prompt(|| Ok("longenough\n".to_string()))
            .unwrap()
            .unwrap();
        assert_eq!(secret.as_str(), "longenough");
    }

    #[test]
    fn generated_secret_is_alphanumeric() {
        let secret = generate();
        assert_eq!(secret.len(), 24);
        assert!(secret.chars().all(|c| c.is_ascii_alphanumeric()));
        // Two draws colliding would mean the RNG is broken.
        assert_ne!(generate().as_str(), secret.as_str());
    }
}
