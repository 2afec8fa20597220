//! Skill archive construction.
//!
//! A packaged skill is a ZIP file named `<skill-name>.skill` whose entries all
//! live under a single `<skill-name>/` folder. Entry paths are computed
//! relative to the parent of the skill directory, so the skill folder itself
//! becomes the top-level entry.
//!
//! The archive is assembled in a hidden temporary file next to the
//! destination and renamed into place only after every entry has been
//! written and synced. On failure the temporary file is dropped and nothing
//! is left at the destination.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::discovery::dir_name;
use crate::error::{ArchiveCause, PackError};
use crate::skill::ARCHIVE_EXTENSION;
use crate::validation::{name_mismatch, validate_skill_dir, NameMismatch, ValidatedSkill};

/// Outcome of a successful packaging run.
#[derive(Debug, Clone)]
pub struct PackReport {
    /// Final archive location.
    pub output_path: PathBuf,
    /// Archive size in bytes.
    pub size_bytes: u64,
    /// Entry names in the order they were written.
    pub entries: Vec<String>,
    /// Set when the declared name differs from the directory name.
    pub name_mismatch: Option<NameMismatch>,
}

/// A file scheduled for the archive.
#[derive(Debug)]
struct ArchiveFile {
    source: PathBuf,
    entry_name: String,
}

/// Validate `<source_dir>/<skill_name>` and package it into `output_dir`.
pub fn package_skill(
    skill_name: &str,
    source_dir: &Path,
    output_dir: &Path,
) -> Result<PackReport, PackError> {
    let skill = validate_skill_dir(skill_name, &source_dir.join(skill_name))?;
    pack_skill(&skill, output_dir)
}

/// Write a validated skill into `<output_dir>/<name>.skill`.
///
/// An existing archive at the destination is replaced.
pub fn pack_skill(skill: &ValidatedSkill, output_dir: &Path) -> Result<PackReport, PackError> {
    prepare_output_dir(output_dir)?;

    let output_path = output_dir.join(format!("{}.{ARCHIVE_EXTENSION}", skill.name));
    let archive_err = |source: ArchiveCause| PackError::ArchiveWriteError {
        path: output_path.clone(),
        source,
    };

    let mismatch = skill
        .metadata
        .required_name()
        .and_then(|declared| name_mismatch(declared, &skill.dir_path));
    if let Some(mismatch) = &mismatch {
        tracing::warn!(skill = %skill.name, "{mismatch}");
    }

    let files = collect_files(&skill.dir_path, &output_path).map_err(archive_err)?;

    let mut temp = tempfile::Builder::new()
        .prefix(&format!(".{}.", skill.name))
        .suffix(".tmp")
        .tempfile_in(output_dir)
        .map_err(|err| archive_err(err.into()))?;
    tracing::debug!(temp = %temp.path().display(), "writing archive to temporary file");

    write_entries(temp.as_file_mut(), &files).map_err(archive_err)?;
    temp.as_file()
        .sync_all()
        .map_err(|err| archive_err(err.into()))?;
    temp.persist(&output_path)
        .map_err(|err| archive_err(err.into()))?;

    let size_bytes = fs::metadata(&output_path)
        .map_err(|err| archive_err(err.into()))?
        .len();

    tracing::info!(
        path = %output_path.display(),
        entries = files.len(),
        size_bytes,
        "skill packaged"
    );

    Ok(PackReport {
        output_path,
        size_bytes,
        entries: files.into_iter().map(|f| f.entry_name).collect(),
        name_mismatch: mismatch,
    })
}

fn prepare_output_dir(output_dir: &Path) -> Result<(), PackError> {
    if output_dir.exists() && !output_dir.is_dir() {
        return Err(PackError::OutputPathError {
            path: output_dir.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotADirectory, "not a directory"),
        });
    }
    fs::create_dir_all(output_dir).map_err(|source| PackError::OutputPathError {
        path: output_dir.to_path_buf(),
        source,
    })
}

/// Enumerate every file under `skill_dir`, hidden files included.
fn collect_files(skill_dir: &Path, output_path: &Path) -> Result<Vec<ArchiveFile>, ArchiveCause> {
    let base = skill_dir.parent().unwrap_or_else(|| Path::new(""));
    let archive_name = dir_name(output_path);
    let destination = output_path
        .parent()
        .and_then(|dir| fs::canonicalize(dir).ok())
        .map(|dir| dir.join(&archive_name));

    let mut files = Vec::new();
    for entry in WalkDir::new(skill_dir) {
        let entry = entry?;
        if entry.file_type().is_dir() || !entry.path().is_file() {
            continue;
        }

        // An earlier archive written inside the skill folder is not content.
        if entry.file_name().to_string_lossy() == archive_name
            && fs::canonicalize(entry.path()).ok() == destination
        {
            continue;
        }

        let relative = entry.path().strip_prefix(base).map_err(io::Error::other)?;
        files.push(ArchiveFile {
            entry_name: entry_name(relative),
            source: entry.into_path(),
        });
    }

    Ok(files)
}

/// Archive-internal names always use `/`.
fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn write_entries(file: &mut File, files: &[ArchiveFile]) -> Result<(), ArchiveCause> {
    let mut writer = ZipWriter::new(file);

    for archive_file in files {
        let mut source = File::open(&archive_file.source)?;
        let options = entry_options(&source.metadata()?);
        writer.start_file(archive_file.entry_name.clone(), options)?;
        io::copy(&mut source, &mut writer)?;
        tracing::debug!(entry = %archive_file.entry_name, "added archive entry");
    }

    writer.finish()?;
    Ok(())
}

/// Deflate with a pinned timestamp so unchanged skills repack identically.
fn entry_options(metadata: &fs::Metadata) -> SimpleFileOptions {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .large_file(metadata.len() >= u64::from(u32::MAX));
    with_permissions(options, metadata)
}

#[cfg(unix)]
fn with_permissions(options: SimpleFileOptions, metadata: &fs::Metadata) -> SimpleFileOptions {
    use std::os::unix::fs::PermissionsExt;
    options.unix_permissions(metadata.permissions().mode())
}

#[cfg(not(unix))]
fn with_permissions(options: SimpleFileOptions, _metadata: &fs::Metadata) -> SimpleFileOptions {
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use std::io::Read;
    use tempfile::TempDir;

    fn demo_skill(parent: &Path) -> PathBuf {
        let skill_dir = parent.join("demo");
        fs::create_dir_all(skill_dir.join("scripts")).expect("mkdir");
        fs::write(
            skill_dir.join("SKILL.md"),
            "---\nname: demo\ndescription: \"A demo\"\n---\nBody\n",
        )
        .expect("write skill file");
        fs::write(skill_dir.join("scripts/run.sh"), "#!/bin/sh\necho hi\n").expect("write");
        skill_dir
    }

    fn read_archive(path: &Path) -> BTreeMap<String, Vec<u8>> {
        let file = File::open(path).expect("open archive");
        let mut archive = zip::ZipArchive::new(file).expect("read archive");
        let mut contents = BTreeMap::new();
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).expect("entry");
            let mut data = Vec::new();
            entry.read_to_end(&mut data).expect("read entry");
            contents.insert(entry.name().to_string(), data);
        }
        contents
    }

    fn temp_leftovers(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .expect("read dir")
            .filter_map(Result::ok)
            .map(|e| e.file_name().to_string_lossy().to_string())
            .filter(|name| name.ends_with(".tmp"))
            .collect()
    }

    #[test]
    fn package_demo_skill() {
        let src = TempDir::new().expect("temp dir");
        let out = TempDir::new().expect("temp dir");
        demo_skill(src.path());

        let report = package_skill("demo", src.path(), out.path()).expect("packaged");
        assert_eq!(report.output_path, out.path().join("demo.skill"));
        assert_eq!(
            report.size_bytes,
            fs::metadata(&report.output_path).expect("stat").len()
        );
        assert_eq!(report.name_mismatch, None);

        let contents = read_archive(&report.output_path);
        let names: Vec<&str> = contents.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["demo/SKILL.md", "demo/scripts/run.sh"]);
        assert_eq!(contents["demo/scripts/run.sh"], b"#!/bin/sh\necho hi\n");
        assert!(temp_leftovers(out.path()).is_empty());
    }

    #[test]
    fn every_file_is_included_under_the_skill_folder() {
        let src = TempDir::new().expect("temp dir");
        let out = TempDir::new().expect("temp dir");
        let skill_dir = demo_skill(src.path());
        fs::create_dir_all(skill_dir.join("assets/deep/er")).expect("mkdir");
        fs::write(skill_dir.join(".hidden"), "secret").expect("write");
        fs::write(skill_dir.join("assets/deep/er/data.bin"), [0u8, 1, 2, 255]).expect("write");
        fs::create_dir_all(skill_dir.join("empty-dir")).expect("mkdir");

        let report = package_skill("demo", src.path(), out.path()).expect("packaged");
        assert_eq!(report.entries.len(), 4);

        let contents = read_archive(&report.output_path);
        assert_eq!(contents.len(), 4);
        assert!(contents.keys().all(|name| name.starts_with("demo/")));
        assert_eq!(contents["demo/.hidden"], b"secret");
        assert_eq!(contents["demo/assets/deep/er/data.bin"], vec![0u8, 1, 2, 255]);
    }

    #[test]
    fn repackaging_is_idempotent() {
        let src = TempDir::new().expect("temp dir");
        let out_a = TempDir::new().expect("temp dir");
        let out_b = TempDir::new().expect("temp dir");
        demo_skill(src.path());

        let first = package_skill("demo", src.path(), out_a.path()).expect("packaged");
        let second = package_skill("demo", src.path(), out_b.path()).expect("packaged");

        assert_eq!(read_archive(&first.output_path), read_archive(&second.output_path));
        assert_eq!(
            fs::read(&first.output_path).expect("read first"),
            fs::read(&second.output_path).expect("read second")
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn failed_entry_write_leaves_nothing_behind() {
        let mem = Path::new("/proc/self/mem");
        if !mem.is_file() {
            return;
        }

        let src = TempDir::new().expect("temp dir");
        let out = TempDir::new().expect("temp dir");
        let skill_dir = demo_skill(src.path());
        // Reading from offset 0 of process memory fails with EIO mid-copy.
        std::os::unix::fs::symlink(mem, skill_dir.join("memory")).expect("symlink");

        let err = package_skill("demo", src.path(), out.path()).unwrap_err();
        assert!(matches!(err, PackError::ArchiveWriteError { .. }));
        assert!(err.to_string().contains("demo.skill"));
        assert!(temp_leftovers(out.path()).is_empty());
        assert!(!out.path().join("demo.skill").exists());
    }

    #[test]
    fn existing_archive_is_replaced() {
        let src = TempDir::new().expect("temp dir");
        let out = TempDir::new().expect("temp dir");
        demo_skill(src.path());
        fs::write(out.path().join("demo.skill"), "stale").expect("write");

        let report = package_skill("demo", src.path(), out.path()).expect("packaged");
        assert_eq!(read_archive(&report.output_path).len(), 2);
    }

    #[test]
    fn output_inside_skill_dir_excludes_the_archive() {
        let src = TempDir::new().expect("temp dir");
        let skill_dir = demo_skill(src.path());

        package_skill("demo", src.path(), &skill_dir).expect("first");
        let report = package_skill("demo", src.path(), &skill_dir).expect("second");

        let contents = read_archive(&report.output_path);
        assert!(!contents.contains_key("demo/demo.skill"));
        assert_eq!(contents.len(), 2);
    }

    #[test]
    fn output_dir_is_created() {
        let src = TempDir::new().expect("temp dir");
        let out = TempDir::new().expect("temp dir");
        demo_skill(src.path());

        let nested = out.path().join("dist/skills");
        let report = package_skill("demo", src.path(), &nested).expect("packaged");
        assert!(report.output_path.starts_with(&nested));
    }

    #[test]
    fn output_path_that_is_a_file_fails_cleanly() {
        let src = TempDir::new().expect("temp dir");
        let out = TempDir::new().expect("temp dir");
        demo_skill(src.path());
        let blocker = out.path().join("not-a-dir");
        fs::write(&blocker, "file").expect("write");

        let err = package_skill("demo", src.path(), &blocker).unwrap_err();
        assert!(matches!(err, PackError::OutputPathError { .. }));
        assert_eq!(err.code(), "output-path-error");
        assert!(temp_leftovers(out.path()).is_empty());
    }

    #[test]
    fn name_mismatch_is_reported_not_fatal() {
        let src = TempDir::new().expect("temp dir");
        let out = TempDir::new().expect("temp dir");
        let skill_dir = src.path().join("demo");
        fs::create_dir_all(&skill_dir).expect("mkdir");
        fs::write(
            skill_dir.join("SKILL.md"),
            "---\nname: something-else\ndescription: d\n---\n",
        )
        .expect("write");

        let report = package_skill("demo", src.path(), out.path()).expect("packaged");
        let mismatch = report.name_mismatch.expect("mismatch");
        assert_eq!(mismatch.declared, "something-else");
    }

    #[test]
    fn entry_names_use_forward_slashes() {
        let relative = Path::new("demo").join("scripts").join("run.sh");
        assert_eq!(entry_name(&relative), "demo/scripts/run.sh");
    }
}
