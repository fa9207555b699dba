//! Shell integration snippets.
//!
//! Each snippet runs `tack --quiet` whenever the working directory changes.

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
}

const BASH_HOOK: &str = "# tack shell hook: add this to your .bashrc or .bash_profile
_tack_cd() {
    builtin cd \"$@\" && tack --quiet
}
alias cd='_tack_cd'";

const ZSH_HOOK: &str = "# tack shell hook: add this to your .zshrc
autoload -U add-zsh-hook
_tack_chpwd() {
    tack --quiet
}
add-zsh-hook chpwd _tack_chpwd";

const FISH_HOOK: &str = "# tack shell hook: add this to ~/.config/fish/conf.d/tack.fish
function _tack_cd --on-variable PWD
    tack --quiet
end";

pub fn snippet(shell: Shell) -> &'static str {
    match shell {
        Shell::Bash => BASH_HOOK,
        Shell::Zsh => ZSH_HOOK,
        Shell::Fish => FISH_HOOK,
    }
}
