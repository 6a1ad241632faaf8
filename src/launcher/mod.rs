// file: src/launcher/mod.rs
// version: 1.0.0
// guid: d2e85f19-7c04-4b6a-92d3-418ab06c7e95

//! Remote entry sequence assembly
//!
//! Builds the command sequence executed on the compute node: fetch azcopy,
//! copy the training data, run environment setup, launch the training
//! command. The same sequence, rooted at the workdir mount, becomes the
//! submitted job's command.

use crate::config::JobConfig;
use crate::script::{ScriptBuilder, ShellRunner};
use crate::storage::SasUrl;
use crate::Result;
use tracing::info;

/// azcopy release downloaded onto the compute node
pub const AZCOPY_RELEASE_URL: &str =
    "https://azcopyvnext.azureedge.net/release20221108/azcopy_linux_amd64_10.16.2.tar.gz";
const AZCOPY_ARCHIVE: &str = "azcopy_linux_amd64_10.16.2.tar.gz";
const AZCOPY_EXTRACT_DIR: &str = "/tmp/azcopy_linux_amd64_10.16.2";

/// Parameters of one entry-sequence run
#[derive(Debug, Clone, Default)]
pub struct LaunchSpec {
    /// Directory to change into before anything else; empty to stay put
    pub workdir: String,
    /// Container SAS URL; empty disables the data-copy phase
    pub sas: String,
    /// Directory inside the container to copy; empty disables data copy
    pub data_dir: String,
    /// Optional azcopy --include-path filter
    pub data_subdir: String,
    /// Environment setup commands
    pub setup: Vec<String>,
    /// Training commands
    pub script: Vec<String>,
}

/// Assemble the ordered entry sequence for `spec`
pub fn build_entry_script(spec: &LaunchSpec) -> Result<ScriptBuilder> {
    let mut builder = ScriptBuilder::new();

    if !spec.sas.is_empty() && !spec.data_dir.is_empty() {
        let data_src = SasUrl::parse(&spec.sas)?.join(&spec.data_dir);

        builder.print("Copying data...");
        builder.add(&format!("wget -P /tmp \"{}\"", AZCOPY_RELEASE_URL));
        builder.add(&format!("tar -zxvf /tmp/{} -C /tmp", AZCOPY_ARCHIVE));
        let mut copy = format!(
            "{}/azcopy copy --recursive \"{}\" /tmp",
            AZCOPY_EXTRACT_DIR, data_src
        );
        if !spec.data_subdir.is_empty() {
            copy.push_str(&format!(" --include-path \"{}\"", spec.data_subdir));
        }
        builder.add(&copy);
        builder.print("Data copy done.");
    }

    let setup: Vec<&String> = spec
        .setup
        .iter()
        .filter(|line| !line.trim().is_empty())
        .collect();
    if !setup.is_empty() {
        builder.print("Setting up environment...");
        for line in setup {
            builder.add(line);
        }
        builder.print("Environment setup done.");
    }

    builder.print("Start training...");
    for line in spec.script.iter().filter(|line| !line.trim().is_empty()) {
        builder.add(line);
    }

    Ok(builder)
}

/// Build the command string embedded in a submitted job: the entry sequence
/// rooted at the job's workdir output mount
pub fn build_job_command(config: &JobConfig) -> Result<String> {
    let spec = LaunchSpec {
        workdir: String::new(),
        sas: if config.experiment.copy_data {
            config.storage.sas_token.clone()
        } else {
            String::new()
        },
        data_dir: config.experiment.data_dir.clone(),
        data_subdir: config.experiment.data_subdir.clone(),
        setup: config.environment.setup_script.clone(),
        script: config.experiment.script.clone(),
    };
    let builder = build_entry_script(&spec)?;

    Ok(format!("cd ${{{{outputs.workdir}}}} ; {}", builder.script()))
}

/// Run the entry sequence locally: chdir, echo the joined script, execute.
/// Returns the shell's exit code.
pub fn run(spec: &LaunchSpec, runner: &mut dyn ShellRunner, print_only: bool) -> Result<i32> {
    if !spec.workdir.is_empty() {
        std::env::set_current_dir(&spec.workdir).map_err(|e| {
            crate::error::SubmitAgentError::ConfigError(format!(
                "Cannot change into workdir {}: {}",
                spec.workdir, e
            ))
        })?;
    }

    let builder = build_entry_script(spec)?;
    // The joined script is printed for observability; credentials stay
    // visible only in the executable halves.
    println!("{}", builder.script());

    if print_only {
        return Ok(0);
    }

    info!("Launching entry sequence ({} fragments)", builder.len());
    builder.run(runner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::REDACTION_MARKER;

    const SAS: &str = "https://acct.blob.core.windows.net/c?sv=1&st=2&se=3&sr=4&sp=5&sig=6";

    fn full_spec() -> LaunchSpec {
        LaunchSpec {
            workdir: String::new(),
            sas: SAS.to_string(),
            data_dir: "datasets/demo".to_string(),
            data_subdir: "train".to_string(),
            setup: vec!["pip install -e .".to_string()],
            script: vec!["python train.py".to_string()],
        }
    }

    #[test]
    fn test_phases_in_order() {
        let builder = build_entry_script(&full_spec()).unwrap();
        let script = builder.script();

        let copying = script.find("Copying data...").unwrap();
        let copy_done = script.find("Data copy done.").unwrap();
        let setup = script.find("Setting up environment...").unwrap();
        let setup_done = script.find("Environment setup done.").unwrap();
        let training = script.find("Start training...").unwrap();
        assert!(copying < copy_done);
        assert!(copy_done < setup);
        assert!(setup < setup_done);
        assert!(setup_done < training);
        assert!(training < script.find("python train.py").unwrap());
    }

    #[test]
    fn test_data_copy_splices_sas() {
        let builder = build_entry_script(&full_spec()).unwrap();
        let script = builder.script();
        assert!(script.contains(
            "azcopy copy --recursive \"https://acct.blob.core.windows.net/c/datasets/demo?sv=1&st=2&se=3&sr=4&sp=5&sig=6\" /tmp"
        ));
        assert!(script.contains(" --include-path \"train\""));
        // The echoed copy of the same command is masked
        assert!(script.contains(REDACTION_MARKER));
    }

    #[test]
    fn test_data_copy_skipped_without_sas() {
        let mut spec = full_spec();
        spec.sas.clear();
        let builder = build_entry_script(&spec).unwrap();
        let script = builder.script();
        assert!(!script.contains("Copying data..."));
        assert!(!script.contains("azcopy"));
        assert!(script.contains("Start training..."));
    }

    #[test]
    fn test_setup_skipped_when_blank() {
        let mut spec = full_spec();
        spec.sas.clear();
        spec.setup = vec!["   ".to_string()];
        let builder = build_entry_script(&spec).unwrap();
        assert!(!builder.script().contains("Setting up environment..."));
    }

    #[test]
    fn test_no_include_path_without_subdir() {
        let mut spec = full_spec();
        spec.data_subdir.clear();
        let builder = build_entry_script(&spec).unwrap();
        assert!(!builder.script().contains("--include-path"));
    }

    #[test]
    fn test_invalid_sas_is_rejected() {
        let mut spec = full_spec();
        spec.sas = "https://acct.blob.core.windows.net/c".to_string();
        assert!(build_entry_script(&spec).is_err());
    }

    #[test]
    fn test_job_command_roots_at_workdir_mount() {
        let mut cfg = crate::config::JobConfig::default();
        cfg.experiment.copy_data = false;
        cfg.experiment.script = vec!["python train.py".to_string()];
        let command = build_job_command(&cfg).unwrap();
        assert!(command.starts_with("cd ${{outputs.workdir}} ; "));
        assert!(command.contains("python train.py"));
    }

    #[test]
    fn test_job_command_omits_data_copy_when_disabled() {
        let mut cfg = crate::config::JobConfig::default();
        cfg.storage.sas_token = SAS.to_string();
        cfg.experiment.copy_data = false;
        cfg.experiment.script = vec!["python train.py".to_string()];
        let command = build_job_command(&cfg).unwrap();
        assert!(!command.contains("azcopy"));
    }
}
