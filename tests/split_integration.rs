mod common;

use abundsplit::core::config::GroupSelection;
use abundsplit::core::labels::LabelSelection;
use abundsplit::core::splitter::SplitInputs;
use abundsplit::output::OutputKind;
use abundsplit::{AbundSplitError, CancellationToken, SplitConfig, Splitter};
use common::{list_inputs, Fixture, FASTA, GROUPS};
use pretty_assertions::assert_eq;

fn only(label: &str) -> LabelSelection {
    label.parse().unwrap()
}

#[test]
fn test_list_snapshot_split() {
    let fixture = Fixture::new();
    let mut config = SplitConfig::new(1);
    config.labels = only("0.03");

    let outcome = Splitter::new(config, list_inputs(&fixture)).run().unwrap();

    assert_eq!(fixture.read("run.0.03.rare.list"), "0.03\t1\tD\n");
    assert_eq!(fixture.read("run.0.03.abund.list"), "0.03\t2\tA,B,C\tE,F\n");
    assert!(!outcome.cancelled);

    let summary = &outcome.summaries[0];
    assert_eq!(summary.label.as_deref(), Some("0.03"));
    assert_eq!((summary.rare, summary.abundant), (1, 5));
    assert_eq!((summary.rare_bins, summary.abundant_bins), (1, 2));

    assert_eq!(
        outcome.outputs.paths(OutputKind::List),
        &[fixture.path("run.0.03.rare.list"), fixture.path("run.0.03.abund.list")]
    );
    assert!(outcome.outputs.paths(OutputKind::Names).is_empty());
}

#[test]
fn test_names_only_split() {
    let fixture = Fixture::new();
    let inputs = SplitInputs {
        names: Some(fixture.write("seqs.names", "X\tX,Y,Z\nW\tW\n")),
        ..SplitInputs::default()
    };

    let outcome = Splitter::new(SplitConfig::new(2), inputs).run().unwrap();

    assert_eq!(fixture.read("seqs.rare.names"), "W\tW\n");
    assert_eq!(fixture.read("seqs.abund.names"), "X\tX,Y,Z\n");
    assert_eq!(outcome.summaries.len(), 1);
    assert_eq!(outcome.summaries[0].label, None);
}

#[test]
fn test_every_label_by_default() {
    let fixture = Fixture::new();
    let outcome = Splitter::new(SplitConfig::new(1), list_inputs(&fixture))
        .run()
        .unwrap();

    let labels: Vec<_> = outcome
        .summaries
        .iter()
        .map(|s| s.label.clone().unwrap())
        .collect();
    assert_eq!(labels, vec!["unique", "0.03", "0.05"]);

    assert_eq!(fixture.read("run.unique.rare.list"), "unique\t6\tA\tB\tC\tD\tE\tF\n");
    assert_eq!(fixture.read("run.unique.abund.list"), "");
    assert_eq!(fixture.read("run.0.05.abund.list"), "0.05\t2\tA,B,C,D\tE,F\n");
    assert_eq!(fixture.read("run.0.05.rare.list"), "");
}

#[test]
fn test_missing_label_uses_next_snapshot() {
    let fixture = Fixture::new();
    let mut config = SplitConfig::new(1);
    config.labels = only("0.02");

    let outcome = Splitter::new(config, list_inputs(&fixture)).run().unwrap();

    assert!(fixture.exists("run.0.03.rare.list"));
    assert!(!fixture.exists("run.0.05.rare.list"));
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].contains("0.02"));
    assert!(outcome.warnings[0].contains("0.03"));
}

#[test]
fn test_label_past_end_uses_last_snapshot() {
    let fixture = Fixture::new();
    let mut config = SplitConfig::new(1);
    config.labels = only("0.10");

    let outcome = Splitter::new(config, list_inputs(&fixture)).run().unwrap();

    assert_eq!(outcome.summaries.len(), 1);
    assert_eq!(outcome.summaries[0].label.as_deref(), Some("0.05"));
    assert!(fixture.exists("run.0.05.abund.list"));
}

#[test]
fn test_outputs_agree_across_kinds() {
    let fixture = Fixture::new();
    let mut inputs = list_inputs(&fixture);
    inputs.names = Some(fixture.write(
        "run.names",
        "A\tA,a1\nB\tB\nC\tC\nD\tD,d1,d2\nE\tE\nF\tF\n",
    ));
    inputs.groups = Some(fixture.write(
        "run.groups",
        &format!("{}a1\tg1\nd1\tg2\nd2\tg2\n", GROUPS),
    ));
    inputs.fasta = Some(fixture.write("run.fasta", FASTA));

    let mut config = SplitConfig::new(1);
    config.labels = only("0.03");
    config.accnos = true;

    let outcome = Splitter::new(config, inputs).run().unwrap();

    assert_eq!(fixture.read("run.0.03.rare.names"), "D\tD,d1,d2\n");
    assert_eq!(
        fixture.read("run.0.03.abund.names"),
        "A\tA,a1\nB\tB\nC\tC\nE\tE\nF\tF\n"
    );
    assert_eq!(fixture.read("run.0.03.rare.groups"), "D\tg1\nd1\tg2\nd2\tg2\n");
    assert_eq!(fixture.read("run.0.03.rare.accnos"), "D\n");
    assert_eq!(fixture.read("run.0.03.abund.accnos"), "A\nB\nC\nE\nF\n");
    assert_eq!(fixture.read("run.0.03.rare.fasta"), ">D sample=g1\nTTTT\n");
    assert_eq!(
        fixture.read("run.0.03.abund.fasta"),
        ">A\nACGT\n>B\nACGA\n>C\nACGC\n>E\nGGGG\n>F\nCCCC\n"
    );

    let kinds: Vec<_> = outcome.outputs.kinds().map(|(kind, _)| kind).collect();
    assert_eq!(
        kinds,
        vec![
            OutputKind::List,
            OutputKind::Names,
            OutputKind::Groups,
            OutputKind::Accnos,
            OutputKind::Fasta
        ]
    );
    assert_eq!(outcome.outputs.len(), 10);
}

#[test]
fn test_group_stratification() {
    let fixture = Fixture::new();
    let mut inputs = list_inputs(&fixture);
    inputs.groups = Some(fixture.write("run.groups", GROUPS));

    let mut config = SplitConfig::new(1);
    config.labels = only("0.03");
    config.groups = GroupSelection::All;
    config.accnos = true;

    let outcome = Splitter::new(config, inputs).run().unwrap();

    assert_eq!(fixture.read("run.0.03.g1.rare.list"), "0.03\t1\tD\n");
    assert_eq!(fixture.read("run.0.03.g1.abund.list"), "0.03\t1\tA,C\n");
    assert_eq!(fixture.read("run.0.03.g2.rare.list"), "");
    assert_eq!(fixture.read("run.0.03.g2.abund.list"), "0.03\t2\tB\tE,F\n");

    assert_eq!(fixture.read("run.0.03.g1.abund.groups"), "A\tg1\nC\tg1\n");
    assert_eq!(fixture.read("run.0.03.g2.abund.groups"), "B\tg2\nE\tg2\nF\tg2\n");
    assert_eq!(fixture.read("run.0.03.g1.rare.accnos"), "D\n");
    assert_eq!(fixture.read("run.0.03.g2.rare.accnos"), "");

    assert_eq!(
        outcome.outputs.paths(OutputKind::List),
        &[
            fixture.path("run.0.03.g1.rare.list"),
            fixture.path("run.0.03.g1.abund.list"),
            fixture.path("run.0.03.g2.rare.list"),
            fixture.path("run.0.03.g2.abund.list"),
        ]
    );
}

#[test]
fn test_stratified_names_and_fasta() {
    let fixture = Fixture::new();
    let mut inputs = list_inputs(&fixture);
    inputs.names = Some(fixture.write(
        "run.names",
        "A\tA,a1\nB\tB\nC\tC\nD\tD\nE\tE\nF\tF\n",
    ));
    inputs.groups = Some(fixture.write("run.groups", &format!("{}a1\tg2\n", GROUPS)));
    inputs.fasta = Some(fixture.write("run.fasta", FASTA));

    let mut config = SplitConfig::new(1);
    config.labels = only("0.03");
    config.groups = GroupSelection::All;

    Splitter::new(config, inputs).run().unwrap();

    // A's duplicates are split between g1 and g2
    assert_eq!(fixture.read("run.0.03.g1.abund.names"), "A\tA\nC\tC\n");
    assert_eq!(fixture.read("run.0.03.g2.abund.names"), "a1\ta1\nB\tB\nE\tE\nF\tF\n");
    assert_eq!(fixture.read("run.0.03.g1.rare.names"), "D\tD\n");
    assert_eq!(fixture.read("run.0.03.g2.rare.names"), "");

    assert_eq!(fixture.read("run.0.03.g1.abund.groups"), "A\tg1\nC\tg1\n");
    assert_eq!(
        fixture.read("run.0.03.g2.abund.groups"),
        "a1\tg2\nB\tg2\nE\tg2\nF\tg2\n"
    );

    assert_eq!(fixture.read("run.0.03.g1.abund.fasta"), ">A\nACGT\n>C\nACGC\n");
    assert_eq!(fixture.read("run.0.03.g1.rare.fasta"), ">D sample=g1\nTTTT\n");
    assert_eq!(
        fixture.read("run.0.03.g2.abund.fasta"),
        ">B\nACGA\n>E\nGGGG\n>F\nCCCC\n"
    );
    assert_eq!(fixture.read("run.0.03.g2.rare.fasta"), "");
}

#[test]
fn test_duplicates_without_group_are_skipped() {
    let fixture = Fixture::new();
    let inputs = SplitInputs {
        names: Some(fixture.write("seqs.names", "X\tX,Y,Z\nW\tW,V\n")),
        groups: Some(fixture.write("seqs.groups", "X\tg1\nY\tg1\nZ\tg2\nW\tg1\n")),
        ..SplitInputs::default()
    };

    let mut config = SplitConfig::new(2);
    config.groups = GroupSelection::All;
    config.accnos = true;

    let outcome = Splitter::new(config, inputs).run().unwrap();

    assert_eq!(fixture.read("seqs.g1.rare.names"), "W\tW\n");
    assert_eq!(fixture.read("seqs.g1.abund.names"), "X\tX,Y\n");
    assert_eq!(fixture.read("seqs.g2.abund.names"), "Z\tZ\n");
    assert_eq!(fixture.read("seqs.g1.rare.groups"), "W\tg1\n");
    assert_eq!(fixture.read("seqs.g1.abund.groups"), "X\tg1\nY\tg1\n");
    assert_eq!(fixture.read("seqs.g1.rare.accnos"), "W\n");

    for path in outcome.outputs.all() {
        let contents = std::fs::read_to_string(path).unwrap();
        assert!(!contents.contains('V'), "{} mentions V", path.display());
    }
}

#[test]
fn test_ungrouped_duplicate_left_out_of_groups_file() {
    let fixture = Fixture::new();
    let inputs = SplitInputs {
        names: Some(fixture.write("seqs.names", "X\tX,Y,Z\nW\tW,V\n")),
        groups: Some(fixture.write("seqs.groups", "X\tg1\nY\tg1\nZ\tg2\nW\tg1\n")),
        ..SplitInputs::default()
    };

    let mut config = SplitConfig::new(2);
    config.accnos = true;

    Splitter::new(config, inputs).run().unwrap();

    assert_eq!(fixture.read("seqs.rare.groups"), "W\tg1\n");
    assert_eq!(fixture.read("seqs.abund.groups"), "X\tg1\nY\tg1\nZ\tg2\n");
    assert_eq!(fixture.read("seqs.rare.names"), "W\tW,V\n");
    assert_eq!(fixture.read("seqs.rare.accnos"), "W\n");
}

#[test]
fn test_selected_groups_only() {
    let fixture = Fixture::new();
    let mut inputs = list_inputs(&fixture);
    inputs.groups = Some(fixture.write("run.groups", GROUPS));

    let mut config = SplitConfig::new(1);
    config.labels = only("0.03");
    config.groups = "g2".parse().unwrap();

    Splitter::new(config, inputs).run().unwrap();

    assert!(fixture.exists("run.0.03.g2.abund.list"));
    assert!(!fixture.exists("run.0.03.g1.abund.list"));
    assert_eq!(fixture.read("run.0.03.g2.abund.groups"), "B\tg2\nE\tg2\nF\tg2\n");
}

#[test]
fn test_rerun_is_byte_identical() {
    let fixture = Fixture::new();
    let mut inputs = list_inputs(&fixture);
    inputs.groups = Some(fixture.write("run.groups", GROUPS));
    inputs.fasta = Some(fixture.write("run.fasta", FASTA));

    let mut config = SplitConfig::new(2);
    config.groups = GroupSelection::All;
    config.accnos = true;

    let run = |out: &str| {
        let mut config = config.clone();
        config.output_dir = Some(fixture.path(out));
        Splitter::new(config, inputs.clone()).run().unwrap()
    };

    let first = run("first");
    let second = run("second");
    assert_eq!(first.outputs.len(), second.outputs.len());

    for (a, b) in first.outputs.all().iter().zip(second.outputs.all()) {
        assert_eq!(a.file_name(), b.file_name());
        assert_eq!(std::fs::read(a).unwrap(), std::fs::read(b).unwrap());
    }
}

#[test]
fn test_zero_cutoff_writes_nothing() {
    let fixture = Fixture::new();
    let result = Splitter::new(SplitConfig::default(), list_inputs(&fixture)).run();

    assert!(matches!(result, Err(AbundSplitError::Config(_))));
    assert_eq!(fixture.listing(), vec!["run.list"]);
}

#[test]
fn test_cancelled_run_leaves_no_partial_files() {
    let fixture = Fixture::new();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome = Splitter::new(SplitConfig::new(1), list_inputs(&fixture))
        .with_cancellation(cancel)
        .run()
        .unwrap();

    assert!(outcome.cancelled);
    assert!(outcome.outputs.is_empty());
    assert_eq!(fixture.listing(), vec!["run.list"]);
}

#[test]
fn test_cancel_mid_run_keeps_finished_labels() {
    let fixture = Fixture::new();
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();

    let outcome = Splitter::new(SplitConfig::new(1), list_inputs(&fixture))
        .with_cancellation(cancel)
        .with_progress_callback(move |label| {
            if label == "0.03" {
                trigger.cancel();
            }
        })
        .run()
        .unwrap();

    assert!(outcome.cancelled);
    assert_eq!(outcome.outputs.len(), 2);
    assert_eq!(outcome.summaries.len(), 1);
    assert_eq!(
        fixture.listing(),
        vec!["run.list", "run.unique.abund.list", "run.unique.rare.list"]
    );
}

#[test]
fn test_malformed_list_is_parse_error() {
    let fixture = Fixture::new();
    let inputs = SplitInputs {
        list: Some(fixture.write("bad.list", "0.03\t3\tA,B\tC\n")),
        ..SplitInputs::default()
    };

    let result = Splitter::new(SplitConfig::new(1), inputs).run();
    assert!(matches!(result, Err(AbundSplitError::Parse(_))));
}

#[test]
fn test_progress_reports_labels() {
    use std::sync::{Arc, Mutex};

    let fixture = Fixture::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    Splitter::new(SplitConfig::new(1), list_inputs(&fixture))
        .with_progress_callback(move |label| sink.lock().unwrap().push(label.to_string()))
        .run()
        .unwrap();

    assert_eq!(*seen.lock().unwrap(), vec!["unique", "0.03", "0.05"]);
}
