//! Shell integration: `claude --use-account <name> ...`

/// Wraps `claude`; `--use-account <name>` switches profiles before running it.
const SHELL_FUNCTION: &str = r##"
# cas - Claude Account Switcher shell integration
# Add to your shell profile:  eval "$(cas setup-shell)"
claude() {
  local account="" args=()
  while [[ $# -gt 0 ]]; do
    case "$1" in
      --use-account)
        account="$2"
        shift 2
        ;;
      --use-account=*)
        account="${1#*=}"
        shift
        ;;
      *)
        args+=("$1")
        shift
        ;;
    esac
  done
  if [[ -n "$account" ]]; then
    command cas switch "$account" || return $?
  fi
  command claude "${args[@]}"
}
"##;

pub fn run() {
    print!("{SHELL_FUNCTION}");
}
