mod common;

use anyhow::Result;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use std::fs;

use common::*;

#[test]
fn test_cli_help_command() {
    let mut cmd = og_reconcile_cmd();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("membership"))
        .stdout(predicate::str::contains("resume"))
        .stdout(predicate::str::contains("overlap"));
}

#[test]
fn test_cli_version_command() {
    og_reconcile_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("og-reconcile"));
}

#[test]
fn test_membership_identical_groups() -> Result<()> {
    let env = TestEnvironment::new()?;
    let paths = env.write_tables(&agreeing_rows())?;

    env.membership_cmd(&paths).assert().success();

    let report = read_to_string(&env.output_path("OG_membership_results_50.txt"))?;
    assert_eq!(
        report,
        "The orthologous clustering similarity comparisons that met the desired threshold value of 50% are listed below:\n\
         \n\
         For the Br_vs_OF comparison, the average score value is: 1.0\n"
    );
    Ok(())
}

#[test]
fn test_membership_threshold_too_high() -> Result<()> {
    let env = TestEnvironment::new()?;
    let paths = env.write_tables(&disagreeing_rows())?;

    env.membership_cmd(&paths).arg("100").assert().success();

    let report = read_to_string(&env.output_path("OG_membership_results_100.txt"))?;
    assert_eq!(
        report,
        "The given threshold value of 100% is too high. No OG comparisons met this criteria."
    );
    Ok(())
}

#[test]
fn test_membership_partial_agreement() -> Result<()> {
    let env = TestEnvironment::new()?;
    let paths = env.write_tables(&disagreeing_rows())?;

    env.membership_cmd(&paths).arg("40").assert().success();

    let report = read_to_string(&env.output_path("OG_membership_results_40.txt"))?;
    let lines: Vec<&str> = report.lines().skip(2).collect();
    assert_eq!(
        lines,
        vec![
            "For the Br_vs_OF comparison, the average score value is: 0.5",
            "For the Br_vs_PO comparison, the average score value is: 0.4",
            "For the Br_vs_SP comparison, the average score value is: 0.4",
            "For the OF_vs_PO comparison, the average score value is: 0.4",
            "For the OF_vs_SP comparison, the average score value is: 0.4",
        ]
    );
    Ok(())
}

#[test]
fn test_threshold_out_of_range_rejected() -> Result<()> {
    let env = TestEnvironment::new()?;
    let paths = env.write_tables(&agreeing_rows())?;

    env.membership_cmd(&paths).arg("101").assert().failure();
    assert!(!env.output_path("OG_membership_results_101.txt").exists());
    Ok(())
}

#[test]
fn test_membership_writes_checkpoints() -> Result<()> {
    let env = TestEnvironment::new()?;
    let paths = env.write_tables(&agreeing_rows())?;

    env.membership_cmd(&paths).assert().success();

    for stem in [
        "table.broccoli",
        "table.orthofinder",
        "table.proteinortho",
        "table.sonicparanoid",
        "crossref",
        "crossref_filtered",
        "scores",
        "means",
    ] {
        assert!(env.checkpoint(stem).exists(), "checkpoint {} missing", stem);
    }

    let filtered: serde_json::Value =
        serde_json::from_str(&read_to_string(&env.checkpoint("crossref_filtered"))?)?;
    assert_eq!(filtered["run_id"], "test_run");
    assert_eq!(filtered["artifact"]["stage"], "filtered_cross_reference");
    assert_eq!(
        filtered["artifact"]["data"]["P1"],
        serde_json::json!(["G1", "H1", "-", "-"])
    );
    assert!(filtered["artifact"]["data"].get("P3").is_none());
    Ok(())
}

#[test]
fn test_no_checkpoint_flag() -> Result<()> {
    let env = TestEnvironment::new()?;
    let paths = env.write_tables(&agreeing_rows())?;

    env.membership_cmd(&paths)
        .arg("--no-checkpoint")
        .assert()
        .success();

    assert!(env.output_path("OG_membership_results_50.txt").exists());
    assert!(!env.checkpoint("crossref").exists());
    Ok(())
}

#[test]
fn test_json_report_format() -> Result<()> {
    let env = TestEnvironment::new()?;
    let paths = env.write_tables(&agreeing_rows())?;
    let output = env.output_path("report.json");

    env.membership_cmd(&paths)
        .arg("--format")
        .arg("json")
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let value: serde_json::Value = serde_json::from_str(&read_to_string(&output)?)?;
    assert_eq!(value["threshold_percent"], 50);
    assert_eq!(value["passing"][0]["pair"], "Br_vs_OF");
    assert_eq!(value["passing"][0]["average"], 1.0);
    Ok(())
}

#[test]
fn test_resume_from_scores_with_new_threshold() -> Result<()> {
    let env = TestEnvironment::new()?;
    let paths = env.write_tables(&disagreeing_rows())?;
    env.membership_cmd(&paths).assert().success();

    og_reconcile_cmd()
        .arg("resume")
        .arg(env.checkpoint("scores"))
        .arg("40")
        .assert()
        .success();

    let report = read_to_string(&env.output_path("OG_membership_results_40.txt"))?;
    assert_eq!(report.lines().count(), 7);
    Ok(())
}

#[test]
fn test_resume_from_table_matches_full_run() -> Result<()> {
    let env = TestEnvironment::new()?;
    let paths = env.write_tables(&disagreeing_rows())?;
    env.membership_cmd(&paths).arg("40").assert().success();
    let full = read_to_string(&env.output_path("OG_membership_results_40.txt"))?;

    let resumed = env.output_path("resumed.txt");
    og_reconcile_cmd()
        .arg("resume")
        .arg(env.checkpoint("table.sonicparanoid"))
        .arg("40")
        .arg("--output")
        .arg(&resumed)
        .assert()
        .success();

    assert_eq!(read_to_string(&resumed)?, full);
    Ok(())
}

#[test]
fn test_resume_missing_tables_fails() -> Result<()> {
    let env = TestEnvironment::new()?;
    let paths = env.write_tables(&agreeing_rows())?;
    env.membership_cmd(&paths).assert().success();
    fs::remove_file(env.checkpoint("table.broccoli"))?;

    og_reconcile_cmd()
        .arg("resume")
        .arg(env.checkpoint("crossref"))
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Missing checkpoint"))
        .stderr(predicate::str::contains("test_run.table.broccoli.json"));
    Ok(())
}

#[test]
fn test_missing_input_is_io_error() -> Result<()> {
    let env = TestEnvironment::new()?;
    let mut paths = env.write_tables(&agreeing_rows())?;
    paths[2] = env.input_dir.join("does_not_exist.txt");

    env.membership_cmd(&paths)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Error:"));
    Ok(())
}

#[test]
fn test_missing_column_is_parse_error() -> Result<()> {
    let env = TestEnvironment::new()?;
    let mut paths = env.write_tables(&agreeing_rows())?;
    paths[0] = env.create_input_file("bad.txt", "Query\tOG\nP1\tG1\n")?;

    env.membership_cmd(&paths)
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Broccoli_OG"));
    Ok(())
}

#[test]
fn test_overlap_outputs() -> Result<()> {
    let env = TestEnvironment::new()?;
    let paths = env.write_tables(&agreeing_rows())?;
    env.membership_cmd(&paths).assert().success();
    let base = env.output_path("giardia");

    og_reconcile_cmd()
        .arg("overlap")
        .arg(env.checkpoint("crossref_filtered"))
        .arg(&base)
        .assert()
        .success();

    let query = read_to_string(&env.output_path("giardia_Query80.txt"))?;
    assert_eq!(
        query,
        "Query\tBroccoli_OG\tOrthoFinder_OG\tProteinOrtho_OG\tSonicParanoid_OG\n\
         P1\tG1\tH1\t-\t-\n\
         P2\tG1\tH1\t-\t-\n"
    );

    let non_query = read_to_string(&env.output_path("giardia_nonQuery80.txt"))?;
    assert_eq!(
        non_query,
        "Broccoli_OG\tOrthoFinder_OG\tProteinOrtho_OG\tSonicParanoid_OG\nG1\tH1\t-\t-\n"
    );

    let orthofinder = read_to_string(&env.output_path("giardia_OrthoFinder_OGs_overlap80.txt"))?;
    assert_eq!(orthofinder, "Query\tOrthoFinder_OG\nP1\tH1\nP2\tH1\n");
    let sonic = read_to_string(&env.output_path("giardia_SonicParanoid_OGs_overlap80.txt"))?;
    assert_eq!(sonic, "Query\tSonicParanoid_OG\n");

    let summary = read_to_string(&env.output_path("giardia__SUMMARY_80.txt"))?;
    assert!(summary.starts_with(
        "The number of orthologous clusters in each pairwise comparison of two orthologous clustering\n\
         programs that met the desired threshold value of 80% are listed below:\n\n\
         For the Br_vs_OF comparison,\n\
         \tthe number of OGs that meet the threshold similarity is: 1\n"
    ));

    let comparisons: serde_json::Value =
        serde_json::from_str(&read_to_string(&env.output_path("giardia_comparisons_80.json"))?)?;
    assert_eq!(comparisons["artifact"]["stage"], "overlap");
    assert_eq!(comparisons["artifact"]["data"]["proteins"]["P1"][0]["pair"], "Br_vs_OF");
    Ok(())
}

#[test]
fn test_overlap_rejects_score_checkpoint() -> Result<()> {
    let env = TestEnvironment::new()?;
    let paths = env.write_tables(&agreeing_rows())?;
    env.membership_cmd(&paths).assert().success();

    og_reconcile_cmd()
        .arg("overlap")
        .arg(env.checkpoint("scores"))
        .arg(env.output_path("out"))
        .assert()
        .code(5)
        .stderr(predicate::str::contains("cross-reference"));
    Ok(())
}

#[test]
fn test_config_print_and_init() -> Result<()> {
    let env = TestEnvironment::new()?;

    og_reconcile_cmd()
        .arg("config")
        .env_remove("OG_RECONCILE_CONFIG")
        .assert()
        .success()
        .stdout(predicate::str::contains("Broccoli_OG"))
        .stdout(predicate::str::contains("threshold_percent = 50"));

    let path = env.output_path("og.toml");
    og_reconcile_cmd()
        .arg("config")
        .arg("--init")
        .arg(&path)
        .env_remove("OG_RECONCILE_CONFIG")
        .assert()
        .success();
    assert!(read_to_string(&path)?.contains("[checkpoint]"));
    Ok(())
}

#[test]
fn test_config_file_overrides_defaults() -> Result<()> {
    let env = TestEnvironment::new()?;
    let mut paths = env.write_tables(&agreeing_rows())?;
    paths[1] = env.create_input_file(
        "orthofinder_custom.txt",
        "protein\tspecies\torthogroup\nP1\tgiardia\tH1\nP2\tgiardia\tH1\n",
    )?;
    let config = env.create_input_file(
        "og.toml",
        "[tools.orthofinder]\nquery_column = \"protein\"\ngroup_column = \"orthogroup\"\n\n[scoring]\nthreshold_percent = 90\n",
    )?;

    env.membership_cmd(&paths)
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    let report = read_to_string(&env.output_path("OG_membership_results_90.txt"))?;
    assert!(report.contains("For the Br_vs_OF comparison, the average score value is: 1.0"));
    Ok(())
}

#[test]
fn test_invalid_config_exit_code() -> Result<()> {
    let env = TestEnvironment::new()?;
    let paths = env.write_tables(&agreeing_rows())?;
    let config = env.create_input_file("bad.toml", "[scoring]\nthreshold_percent = 150\n")?;

    env.membership_cmd(&paths)
        .arg("--config")
        .arg(&config)
        .assert()
        .code(2);
    Ok(())
}
