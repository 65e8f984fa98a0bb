//! End-to-end CLI tests for the bin command.
//!
//! These tests run the actual `umibin bin` binary and validate:
//! 1. Report content for passing and failing bins
//! 2. Secondary-hit expansion and threshold filtering
//! 3. Determinism and record-order invariance
//! 4. Error paths (bad options, missing inputs)

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

use crate::helpers::sam_generator::{
    bin_records, read_lines, sam_record, setup_run_dir, write_sam,
};

const STATS_HEADER: &str = "umi_name read_n_raw read_n_filt read_n_plus read_n_neg \
    read_max_plus read_max_neg read_orientation_ratio ror_filter umi_match_error_mean \
    umi_match_error_sd ume_filter bin_cluster_ratio bcr_filter";

/// Runs `umibin bin` on a prepared directory with the standard thresholds and
/// an explicit orientation fraction.
fn run_bin_with_ro_frac(dir: &Path, ro_frac: &str) -> Output {
    Command::new(env!("CARGO_BIN_EXE_umibin"))
        .args([
            "bin",
            "--output-dir",
            dir.to_str().unwrap(),
            "--per-umi-max",
            "3",
            "--combined-max",
            "6",
            "--ume-mean-max",
            "3",
            "--ume-sd-max",
            "2",
            "--ro-frac",
            ro_frac,
        ])
        .output()
        .expect("Failed to run umibin")
}

/// Runs `umibin bin` with the standard thresholds.
fn run_bin(dir: &Path) -> Output {
    run_bin_with_ro_frac(dir, "0.3")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "umibin failed:\nstdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_balanced_bin_is_emitted() {
    let temp_dir = TempDir::new().unwrap();
    let records = bin_records("umi1;size=1;", "read", 3, 3, 1);
    let subdir = setup_run_dir(temp_dir.path(), &records, &records);

    let output = run_bin(temp_dir.path());
    assert_success(&output);

    let stats = read_lines(&subdir.join("umi_binning_stats.txt"));
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0], STATS_HEADER);
    assert_eq!(
        stats[1],
        "umi1;size=1; 6 6 3 3 10003 10003 0.500000 rof_ok 2.000000 0.000000 ume_ok \
         6.000000 bcr_ok"
    );

    let map = read_lines(&subdir.join("umi_bin_map.txt"));
    assert_eq!(
        map,
        vec![
            "umi1;size=1; read_plus0 2",
            "umi1;size=1; read_plus1 2",
            "umi1;size=1; read_plus2 2",
            "umi1;size=1; read_neg0 2",
            "umi1;size=1; read_neg1 2",
            "umi1;size=1; read_neg2 2",
        ]
    );
}

#[test]
fn test_single_read_bin_fails_orientation() {
    // One record per file for the same read: the bin has a single plus-strand
    // read, so orientation fails and nothing is emitted, but the bin still
    // gets a stats row with the downstream columns empty.
    let temp_dir = TempDir::new().unwrap();
    let subdir = setup_run_dir(
        temp_dir.path(),
        &[sam_record("umi1;size=1;", "read_A", 1, None)],
        &[sam_record("umi1;size=1;", "read_A", 2, None)],
    );

    let output = run_bin(temp_dir.path());
    assert_success(&output);

    let stats = read_lines(&subdir.join("umi_binning_stats.txt"));
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[1], "umi1;size=1; 1 0 1 0 1 0 0.000000 rof_fail     ");

    let map = read_lines(&subdir.join("umi_bin_map.txt"));
    assert!(map.is_empty());
}

#[test]
fn test_one_strand_bin_fails_orientation() {
    // Several reads, all on the plus strand.
    let temp_dir = TempDir::new().unwrap();
    let records = bin_records("umi1;size=1;", "read", 5, 0, 1);
    let subdir = setup_run_dir(temp_dir.path(), &records, &records);

    let output = run_bin(temp_dir.path());
    assert_success(&output);

    let stats = read_lines(&subdir.join("umi_binning_stats.txt"));
    let fields: Vec<&str> = stats[1].split(' ').collect();
    assert_eq!(fields[0], "umi1;size=1;");
    assert_eq!(fields[3], "5"); // read_n_plus
    assert_eq!(fields[4], "0"); // read_n_neg
    assert_eq!(fields[8], "rof_fail");
    assert!(read_lines(&subdir.join("umi_bin_map.txt")).is_empty());
}

#[test]
fn test_subset_bin_gets_stats_row_but_no_emission() {
    // plus=8, neg=2 at ro-frac 0.3: minority 0.2 -> rof_subset, cap 18.
    let temp_dir = TempDir::new().unwrap();
    let records = bin_records("umi1;size=2;", "read", 8, 2, 1);
    let subdir = setup_run_dir(temp_dir.path(), &records, &records);

    let output = run_bin(temp_dir.path());
    assert_success(&output);

    let stats = read_lines(&subdir.join("umi_binning_stats.txt"));
    let fields: Vec<&str> = stats[1].split(' ').collect();
    assert_eq!(fields[8], "rof_subset");
    assert_eq!(fields[2], "10"); // read_n_filt: cap 18 retains everything
    assert_eq!(fields[5], "26"); // read_max_plus = 18 + 8
    assert_eq!(fields[6], "20"); // read_max_neg = 18 + 2
    assert!(read_lines(&subdir.join("umi_bin_map.txt")).is_empty());
}

#[test]
fn test_high_error_bin_fails_ume() {
    // Combined err 6 per read against --ume-mean-max 3.
    let temp_dir = TempDir::new().unwrap();
    let records = bin_records("umi1;size=1;", "read", 3, 3, 3);
    let subdir = setup_run_dir(temp_dir.path(), &records, &records);

    let output = run_bin(temp_dir.path());
    assert_success(&output);

    let stats = read_lines(&subdir.join("umi_binning_stats.txt"));
    let fields: Vec<&str> = stats[1].split(' ').collect();
    assert_eq!(fields[8], "rof_ok");
    assert_eq!(fields[9], "6.000000"); // mean
    assert_eq!(fields[11], "ume_fail");
    assert!(read_lines(&subdir.join("umi_bin_map.txt")).is_empty());
}

#[test]
fn test_oversized_bin_fails_bcr() {
    // 30 reads with cluster size 2: ratio 15 > 10 -> bcr_fail.
    let temp_dir = TempDir::new().unwrap();
    let records = bin_records("umi99;size=2;", "read", 15, 15, 1);
    let subdir = setup_run_dir(temp_dir.path(), &records, &records);

    let output = run_bin(temp_dir.path());
    assert_success(&output);

    let stats = read_lines(&subdir.join("umi_binning_stats.txt"));
    let fields: Vec<&str> = stats[1].split(' ').collect();
    assert_eq!(fields[11], "ume_ok");
    assert_eq!(fields[12], "15.000000");
    assert_eq!(fields[13], "bcr_fail");
    assert!(read_lines(&subdir.join("umi_bin_map.txt")).is_empty());
}

#[test]
fn test_forward_secondary_hits_expand_to_reads() {
    // File 1 carries read_plus1 only inside the XA list of read_plus0's
    // record; read_plus2 appears there too but on the reverse strand, so it
    // never gets a UMI1-end hit and is excluded.
    let temp_dir = TempDir::new().unwrap();
    let umi1 = vec![
        sam_record(
            "umi1;size=1;",
            "read_plus0",
            1,
            Some("read_plus1,+2,18M,1;read_plus2,-2,18M,1;"),
        ),
        sam_record("umi1;size=1;_rc", "read_neg0", 1, None),
        sam_record("umi1;size=1;_rc", "read_neg1", 1, None),
    ];
    let umi2 = vec![
        sam_record("umi1;size=1;", "read_plus0", 1, None),
        sam_record("umi1;size=1;", "read_plus1", 1, None),
        sam_record("umi1;size=1;", "read_plus2", 1, None),
        sam_record("umi1;size=1;_rc", "read_neg0", 1, None),
        sam_record("umi1;size=1;_rc", "read_neg1", 1, None),
    ];
    let subdir = setup_run_dir(temp_dir.path(), &umi1, &umi2);

    let output = run_bin(temp_dir.path());
    assert_success(&output);

    let map = read_lines(&subdir.join("umi_bin_map.txt"));
    assert_eq!(
        map,
        vec![
            "umi1;size=1; read_plus0 2",
            "umi1;size=1; read_plus1 2",
            "umi1;size=1; read_neg0 2",
            "umi1;size=1; read_neg1 2",
        ]
    );
}

#[test]
fn test_per_umi_threshold_drops_read() {
    // read_plus2 has edit distance 4 on the UMI1 end, above --per-umi-max 3.
    let temp_dir = TempDir::new().unwrap();
    let mut umi1 = bin_records("umi1;size=1;", "read", 2, 2, 1);
    umi1.push(sam_record("umi1;size=1;", "read_plus2", 4, None));
    let mut umi2 = bin_records("umi1;size=1;", "read", 2, 2, 1);
    umi2.push(sam_record("umi1;size=1;", "read_plus2", 1, None));
    let subdir = setup_run_dir(temp_dir.path(), &umi1, &umi2);

    let output = run_bin(temp_dir.path());
    assert_success(&output);

    let map = read_lines(&subdir.join("umi_bin_map.txt"));
    assert_eq!(map.len(), 4);
    assert!(!map.iter().any(|line| line.contains("read_plus2")));
}

#[test]
fn test_reruns_are_byte_identical() {
    let temp_dir = TempDir::new().unwrap();
    let mut records = bin_records("umi1;size=1;", "a", 3, 3, 1);
    records.extend(bin_records("umi2;size=2;", "b", 4, 2, 1));
    let subdir = setup_run_dir(temp_dir.path(), &records, &records);

    assert_success(&run_bin(temp_dir.path()));
    let stats_first = std::fs::read(subdir.join("umi_binning_stats.txt")).unwrap();
    let map_first = std::fs::read(subdir.join("umi_bin_map.txt")).unwrap();

    assert_success(&run_bin(temp_dir.path()));
    let stats_second = std::fs::read(subdir.join("umi_binning_stats.txt")).unwrap();
    let map_second = std::fs::read(subdir.join("umi_bin_map.txt")).unwrap();

    assert_eq!(stats_first, stats_second);
    assert_eq!(map_first, map_second);
}

#[test]
fn test_record_order_does_not_change_emitted_reads() {
    let temp_dir_fwd = TempDir::new().unwrap();
    let temp_dir_rev = TempDir::new().unwrap();

    let mut records = bin_records("umi1;size=1;", "a", 3, 3, 1);
    records.extend(bin_records("umi2;size=2;", "b", 2, 2, 1));
    let mut reversed = records.clone();
    reversed.reverse();

    let subdir_fwd = setup_run_dir(temp_dir_fwd.path(), &records, &records);
    let subdir_rev = setup_run_dir(temp_dir_rev.path(), &reversed, &records);

    assert_success(&run_bin(temp_dir_fwd.path()));
    assert_success(&run_bin(temp_dir_rev.path()));

    // Row order follows first-appearance order and may differ; the set of
    // emitted (umi, read, err) rows must not.
    let mut map_fwd = read_lines(&subdir_fwd.join("umi_bin_map.txt"));
    let mut map_rev = read_lines(&subdir_rev.join("umi_bin_map.txt"));
    map_fwd.sort();
    map_rev.sort();
    assert_eq!(map_fwd, map_rev);
}

#[test]
fn test_stats_rows_sorted_by_umi_name() {
    let temp_dir = TempDir::new().unwrap();
    let mut records = bin_records("umi_b;size=1;", "b", 2, 2, 1);
    records.extend(bin_records("umi_a;size=1;", "a", 2, 2, 1));
    let subdir = setup_run_dir(temp_dir.path(), &records, &records);

    assert_success(&run_bin(temp_dir.path()));

    let stats = read_lines(&subdir.join("umi_binning_stats.txt"));
    assert!(stats[1].starts_with("umi_a;size=1; "));
    assert!(stats[2].starts_with("umi_b;size=1; "));
}

#[test]
fn test_header_only_inputs_produce_empty_reports() {
    let temp_dir = TempDir::new().unwrap();
    let subdir = setup_run_dir(temp_dir.path(), &[], &[]);

    let output = run_bin(temp_dir.path());
    assert_success(&output);

    let stats = read_lines(&subdir.join("umi_binning_stats.txt"));
    assert_eq!(stats, vec![STATS_HEADER.to_string()]);
    assert!(read_lines(&subdir.join("umi_bin_map.txt")).is_empty());
}

#[test]
fn test_invalid_ro_frac_fails_without_output() {
    let temp_dir = TempDir::new().unwrap();
    let records = bin_records("umi1;size=1;", "read", 3, 3, 1);
    let subdir = setup_run_dir(temp_dir.path(), &records, &records);

    let output = run_bin_with_ro_frac(temp_dir.path(), "0.6");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ro-frac"), "stderr: {stderr}");
    assert!(!subdir.join("umi_binning_stats.txt").exists());
    assert!(!subdir.join("umi_bin_map.txt").exists());
}

#[test]
fn test_missing_input_fails() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::create_dir_all(temp_dir.path().join("read_binning")).unwrap();
    write_sam(
        &temp_dir.path().join("read_binning").join("umi1_map.sam"),
        &[sam_record("umi1;size=1;", "read_A", 1, None)],
    );
    // umi2_map.sam is absent.

    let output = run_bin(temp_dir.path());
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("UMI2 SAM"), "stderr: {stderr}");
}

#[test]
fn test_malformed_lines_are_tolerated() {
    // A junk line and a record missing its NM tag are skipped; the good
    // records still bin.
    let temp_dir = TempDir::new().unwrap();
    let mut umi1 = bin_records("umi1;size=1;", "read", 2, 2, 1);
    umi1.push("this is not a sam line".to_string());
    umi1.push(sam_record("umi1;size=1;", "read_no_nm", 0, None).replace("NM:i:0", "AS:i:17"));
    let umi2 = bin_records("umi1;size=1;", "read", 2, 2, 1);
    let subdir = setup_run_dir(temp_dir.path(), &umi1, &umi2);

    let output = run_bin(temp_dir.path());
    assert_success(&output);

    let map = read_lines(&subdir.join("umi_bin_map.txt"));
    assert_eq!(map.len(), 4);
}

#[test]
fn test_exactly_balanced_bin_passes_at_half_ro_frac() {
    // --ro-frac 0.5 with an exactly balanced bin passes.
    let temp_dir = TempDir::new().unwrap();
    let records = bin_records("umi1;size=1;", "read", 3, 3, 1);
    let subdir = setup_run_dir(temp_dir.path(), &records, &records);

    let output = run_bin_with_ro_frac(temp_dir.path(), "0.5");
    assert_success(&output);

    let stats = read_lines(&subdir.join("umi_binning_stats.txt"));
    let fields: Vec<&str> = stats[1].split(' ').collect();
    assert_eq!(fields[8], "rof_ok");
    assert_eq!(read_lines(&subdir.join("umi_bin_map.txt")).len(), 6);
}
