//! Shell completion script generation
//!
//! Boundary collaborator for `--completion`: receives the member and flag
//! names discovered on the root component and emits a Bash completion
//! script mentioning each of them. Script internals are deliberately
//! minimal; richer shells can be layered on by embedders.

/// Render a Bash completion script for `name` offering `words`
pub fn bash_script(name: &str, words: &[String]) -> String {
    let func = format!("_{}_complete", sanitize(name));
    let mut wordlist = words.join(" ");
    if wordlist.is_empty() {
        wordlist.push_str("--help");
    }
    format!(
        "# bash completion for {name}\n\
         {func}() {{\n\
         \x20\x20local cur=\"${{COMP_WORDS[COMP_CWORD]}}\"\n\
         \x20\x20COMPREPLY=( $(compgen -W \"{wordlist}\" -- \"$cur\") )\n\
         }}\n\
         complete -F {func} {name}\n"
    )
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
