//! `polyfaq languages` command.

use anyhow::Result;

use polyfaq::i18n::LanguageRegistry;

/// Print every language code the provider accepts.
pub(crate) fn cmd_languages(json: bool) -> Result<()> {
    let languages = LanguageRegistry::builtin().list();
    if json {
        println!("{}", serde_json::to_string_pretty(&languages)?);
        return Ok(());
    }

    println!("{:<8} {}", "Code", "Name");
    println!("{}", "-".repeat(32));
    for lang in &languages {
        println!("{:<8} {}", lang.code, lang.name);
    }
    println!();
    println!("{} languages", languages.len());
    Ok(())
}
