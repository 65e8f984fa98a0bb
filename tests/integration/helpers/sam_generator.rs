//! Synthetic SAM input generation for integration tests.
//!
//! The binning inputs are plain-text SAM files where the query is a UMI
//! reference and the target is a read. These helpers build minimal but
//! well-formed records and lay out the `read_binning/` input directory the
//! `bin` command expects.

use std::fs;
use std::path::{Path, PathBuf};

/// Builds one 11-field SAM data line with an `NM` tag and an optional raw
/// `XA:Z:` value.
pub fn sam_record(umi: &str, read: &str, nm: u32, xa: Option<&str>) -> String {
    let mut fields = vec![
        umi.to_string(),
        "0".to_string(),
        read.to_string(),
        "1".to_string(),
        "60".to_string(),
        "18M".to_string(),
        "*".to_string(),
        "0".to_string(),
        "0".to_string(),
        "ACGTACGTACGTACGTAC".to_string(),
        "*".to_string(),
        format!("NM:i:{nm}"),
    ];
    if let Some(list) = xa {
        fields.push(format!("XA:Z:{list}"));
    }
    fields.join("\t")
}

/// Records for a balanced bin: `n_plus` reads on the canonical strand and
/// `n_neg` on the `_rc` strand, all at edit distance `nm`. Read names are
/// derived from `prefix` so both per-end files can generate the same set.
pub fn bin_records(umi: &str, prefix: &str, n_plus: u64, n_neg: u64, nm: u32) -> Vec<String> {
    let mut records = Vec::new();
    for i in 0..n_plus {
        records.push(sam_record(umi, &format!("{prefix}_plus{i}"), nm, None));
    }
    for i in 0..n_neg {
        records.push(sam_record(&format!("{umi}_rc"), &format!("{prefix}_neg{i}"), nm, None));
    }
    records
}

/// Writes a SAM file with a header line followed by the given records.
pub fn write_sam(path: &Path, records: &[String]) {
    let mut content = String::from("@HD\tVN:1.6\tSO:unsorted\n");
    for record in records {
        content.push_str(record);
        content.push('\n');
    }
    fs::write(path, content).unwrap();
}

/// Creates `<dir>/read_binning/` with both per-end SAM files and returns the
/// subdirectory path.
pub fn setup_run_dir(dir: &Path, umi1_records: &[String], umi2_records: &[String]) -> PathBuf {
    let subdir = dir.join("read_binning");
    fs::create_dir_all(&subdir).unwrap();
    write_sam(&subdir.join("umi1_map.sam"), umi1_records);
    write_sam(&subdir.join("umi2_map.sam"), umi2_records);
    subdir
}

/// Reads a report file into lines.
pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path).unwrap().lines().map(String::from).collect()
}
