//! Reading values out of terraform configuration files.
//!
//! Only two lookups are needed: the `default` of a `variable` block in
//! `variables.tf`, and the `owner_tag` assignment in the generated
//! `terraform.tfvars`. Neither file is fully parsed, the scanner only
//! understands enough HCL to bound a block by its braces.

use crate::config::DEFAULT_OWNER_TAG;
use crate::error::{InfraError, Result};
use crate::models::OwnerTag;
use colored::Colorize;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

static DEFAULT_REGEX: OnceLock<Regex> = OnceLock::new();
static OWNER_TAG_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_default_regex() -> &'static Regex {
    DEFAULT_REGEX
        .get_or_init(|| Regex::new(r#"(?m)^\s*default\s*=\s*"([^"]*)""#).expect("Invalid Regex"))
}

fn get_owner_tag_regex() -> &'static Regex {
    OWNER_TAG_REGEX
        .get_or_init(|| Regex::new(r#"(?m)^\s*owner_tag\s*=\s*"([^"]+)""#).expect("Invalid Regex"))
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| InfraError::Unreadable {
        path: path.to_path_buf(),
        source,
    })
}

/// Read the string `default` of `variable "<name>"` from a `.tf` file.
///
/// # Returns
/// * `Ok(String)` - the default value
/// * `Err(Unreadable)` - the file could not be read
/// * `Err(ValueNotFound)` - no such block, or the block has no string default
pub fn read_variable_default(path: &Path, name: &str) -> Result<String> {
    let content = read(path)?;
    find_variable_default(&content, name).ok_or_else(|| InfraError::ValueNotFound {
        what: format!("variable \"{name}\" default"),
        path: path.to_path_buf(),
    })
}

/// Read `owner_tag = "<value>"` from a tfvars file.
pub fn read_owner_tag(path: &Path) -> Result<OwnerTag> {
    let content = read(path)?;
    find_owner_tag(&content)
        .map(OwnerTag::new)
        .ok_or_else(|| InfraError::ValueNotFound {
            what: "owner_tag".to_string(),
            path: path.to_path_buf(),
        })
}

/// Owner tag from the tfvars file, or `"runner"` when it cannot be determined.
pub fn owner_tag_or_default(path: &Path) -> OwnerTag {
    match read_owner_tag(path) {
        Ok(tag) => {
            log::info!("owner_tag={}", tag.as_str().green());
            tag
        }
        Err(e) => {
            log::warn!("{e}, using owner_tag={DEFAULT_OWNER_TAG}");
            OwnerTag::new(DEFAULT_OWNER_TAG)
        }
    }
}

fn find_owner_tag(content: &str) -> Option<String> {
    get_owner_tag_regex()
        .captures(content)
        .map(|c| c[1].to_string())
}

fn find_variable_default(content: &str, name: &str) -> Option<String> {
    let header = Regex::new(&format!(r#"variable\s+"{}"\s*\{{"#, regex::escape(name))).ok()?;
    let start = header.find(content)?.end();
    let body = block_body(&content[start..])?;
    get_default_regex()
        .captures(body)
        .map(|c| c[1].to_string())
}

/// Text up to the brace closing an already opened block.
fn block_body(rest: &str) -> Option<&str> {
    let mut depth = 1usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in rest.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&rest[..i]);
                }
            }
            _ => {}
        }
    }
    None
}
