//! Shared fixtures: a tiny GTFOBins-shaped corpus on disk.

#![allow(dead_code)]

use gtfobins_mcp::config::Config;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const FUNCTIONS_YML: &str = r#"shell:
  label: Shell
  description: It can be used to break out from restricted environments by spawning an interactive system shell.
file-read:
  label: File read
  description: It reads data from files.
suid:
  label: SUID
  description: If the binary has the SUID bit set, it does not drop the elevated privileges.
sudo:
  label: Sudo
  description: If the binary is allowed to run as superuser by sudo, it does not drop the elevated privileges.
"#;

pub const BASE64_MD: &str = r#"---
description: Encode and decode data in base64.
functions:
  file-read:
    - code: base64 file | base64 --decode
  suid:
    - code: |
        LFILE=file_to_read
        ./base64 "$LFILE" | base64 --decode
---
"#;

pub const FIND_MD: &str = r#"---
functions:
  shell:
    - code: find . -exec /bin/sh \; -quit
  suid:
    - description: This works on Linux only.
      code: ./find . -exec /bin/sh -p \; -quit
  mystery:
    - code: find / -name secret
---
Some Markdown body that is ignored.
"#;

pub const AWK_MD: &str = r#"---
functions:
  shell:
    - code: awk 'BEGIN {system("/bin/sh")}'
  sudo:
    - code: sudo awk 'BEGIN {system("/bin/sh")}'
---
"#;

/// Writes the corpus and catalog under `root` and returns a config whose
/// build inputs and artifact outputs all live there.
pub fn write_corpus(root: &Path) -> Config {
    let corpus = root.join("_gtfobins");
    fs::create_dir_all(&corpus).unwrap();
    fs::write(corpus.join("base64.md"), BASE64_MD).unwrap();
    fs::write(corpus.join("find.md"), FIND_MD).unwrap();
    fs::write(corpus.join("awk.md"), AWK_MD).unwrap();
    fs::write(corpus.join("README.txt"), "not a binary").unwrap();
    fs::write(corpus.join(".hidden.md"), "---\ndescription: x\n---\n").unwrap();

    let data = root.join("_data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("functions.yml"), FUNCTIONS_YML).unwrap();

    let mut cfg = Config::minimal();
    cfg.build.corpus_dir = corpus;
    cfg.build.functions_yml = data.join("functions.yml");
    cfg.artifacts.api_path = root.join("out").join("api.json");
    cfg.artifacts.functions_path = root.join("out").join("functions.json");
    cfg
}

pub fn built_corpus() -> (TempDir, Config) {
    let tmp = TempDir::new().unwrap();
    let cfg = write_corpus(tmp.path());
    gtfobins_mcp::build::run_build(&cfg).unwrap();
    (tmp, cfg)
}
