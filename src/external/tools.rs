use std::path::PathBuf;

use which::which;

use crate::external::runner::ToolInvocation;

pub const BLACKSHEEPWALL: &str = "blacksheepwall";

/// `<program> -domain <domain> -config <config> -json`
pub fn blacksheepwall(program: &str, domain: &str, config: &str) -> ToolInvocation {
    ToolInvocation {
        program: program.to_string(),
        args: vec![
            "-domain".to_string(),
            domain.to_string(),
            "-config".to_string(),
            config.to_string(),
            "-json".to_string(),
        ],
    }
}

/// Resolve `program` against PATH (or check it directly if it is a path).
pub fn locate(program: &str) -> Option<PathBuf> {
    which(program).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_json_invocation() {
        let inv = blacksheepwall(BLACKSHEEPWALL, "example.com", "/etc/bsw.json");
        assert_eq!(inv.program, "blacksheepwall");
        assert_eq!(inv.args, ["-domain", "example.com", "-config", "/etc/bsw.json", "-json"]);
    }

    #[test]
    fn unknown_program_is_not_located() {
        assert!(locate("bsw-recon-no-such-binary").is_none());
    }
}
