use coaler::core::models::ids::UniquePoseId;
use coaler::core::models::pairs::PosePair;
use coaler::core::scoring::{PoseScoreTable, ScoringError};
use coaler::engine::assembly::LigandAlignmentAssembly;
use coaler::engine::config::{
    ConfigError, DeficitPolicy, MultiAlignerConfig, MultiAlignerConfigBuilder,
};
use coaler::engine::error::EngineError;
use coaler::engine::progress::ProgressReporter;
use coaler::workflows::align::MultiAligner;
use itertools::Itertools;
use std::io::Write;
use tempfile::NamedTempFile;

fn pose(ligand_id: usize, pose_id: usize) -> UniquePoseId {
    UniquePoseId::new(ligand_id, pose_id)
}

fn config(k: usize) -> MultiAlignerConfig {
    MultiAlignerConfigBuilder::new()
        .max_starting_assemblies(k)
        .num_threads(2)
        .build()
        .unwrap()
}

/// Three ligands with two poses each; poses (1, 0, 1) agree pairwise at 0.9, all else 0.3.
fn planted_table() -> PoseScoreTable {
    let planted = [1, 0, 1];
    let mut table = PoseScoreTable::new();
    for (a, b) in (0..3).tuple_combinations() {
        for p in 0..2 {
            for q in 0..2 {
                let score = if p == planted[a] && q == planted[b] {
                    0.9
                } else {
                    0.3
                };
                table.insert(pose(a, p), pose(b, q), score);
            }
        }
    }
    table
}

/// Ligands 0 and 2 with three poses each around an empty ligand 1; (0:2, 2:1) is the unique best.
fn gapped_table() -> PoseScoreTable {
    let scores = [[0.1, 0.2, 0.3], [0.4, 0.5, 0.6], [0.2, 1.0, 0.0]];
    let mut table = PoseScoreTable::new();
    for (p, row) in scores.iter().enumerate() {
        for (q, &score) in row.iter().enumerate() {
            table.insert(pose(0, p), pose(2, q), score);
        }
    }
    table
}

/// Pose counts `[3, 0, 3, 2]`; poses (0:2, 2:1, 3:0) agree pairwise at 0.9, all else 0.3.
fn sparse_planted_table() -> PoseScoreTable {
    let planted = [(0, 2), (2, 1), (3, 0)];
    let counts = [3, 0, 3, 2];
    let mut table = PoseScoreTable::new();
    for ((a, best_a), (b, best_b)) in planted.into_iter().tuple_combinations() {
        for p in 0..counts[a] {
            for q in 0..counts[b] {
                let planted_pair = p == best_a && q == best_b;
                let score = if planted_pair { 0.9 } else { 0.3 };
                table.insert(pose(a, p), pose(b, q), score);
            }
        }
    }
    table
}

fn permissive_config() -> MultiAlignerConfigBuilder {
    MultiAlignerConfigBuilder::new()
        .max_starting_assemblies(4)
        .num_threads(2)
        .allow_empty_pose_sets(true)
}

/// Deterministic, symmetric and uneven scores in [0, 1].
fn hashed_score(a: UniquePoseId, b: UniquePoseId) -> Result<f64, ScoringError> {
    let pair = PosePair::new(a, b);
    let (x, y) = (pair.first(), pair.second());
    let mixed = (x.ligand_id * 31 + x.pose_id * 17 + y.ligand_id * 7 + y.pose_id * 13) % 23;
    Ok(mixed as f64 / 22.0)
}

#[test]
fn planted_optimum_matches_brute_force() {
    let table = planted_table();
    let aligner = MultiAligner::from_pose_counts(&[2, 2, 2], table, config(6)).unwrap();
    let prepared = aligner.prepare(&ProgressReporter::new()).unwrap();

    let brute_force_best = (0..2)
        .cartesian_product(0..2)
        .cartesian_product(0..2)
        .map(|((p0, p1), p2)| {
            let assembly = LigandAlignmentAssembly::from_mapping(3, [(0, p0), (1, p1), (2, p2)]);
            prepared.score(&assembly).unwrap()
        })
        .fold(f64::NEG_INFINITY, f64::max);

    let result = aligner.align(&ProgressReporter::new()).unwrap();

    assert!((result.score() - brute_force_best).abs() < 1e-12);
    assert!((result.score() - 2.7).abs() < 1e-12);
    assert_eq!(result.pose_for(0), Some(1));
    assert_eq!(result.pose_for(1), Some(0));
    assert_eq!(result.pose_for(2), Some(1));
    assert_eq!(result.missing_ligands_count(), 0);
}

#[test]
fn single_ligand_scores_zero_with_nothing_missing() {
    let aligner = MultiAligner::from_pose_counts(&[3], hashed_score, config(2)).unwrap();

    let result = aligner.align(&ProgressReporter::new()).unwrap();

    assert_eq!(result.score(), 0.0);
    assert_eq!(result.missing_ligands_count(), 0);
    assert!(result.pose_for(0).is_some());
}

#[test]
fn register_records_the_planted_maximum() {
    let mut table = PoseScoreTable::new();
    for p in 0..3 {
        for q in 0..4 {
            table.insert(pose(0, p), pose(1, q), 0.1 * (p + q) as f64 / 5.0);
        }
    }
    table.insert(pose(0, 1), pose(1, 2), 0.95);
    let aligner = MultiAligner::from_pose_counts(&[3, 4], table, config(1)).unwrap();

    let prepared = aligner.prepare(&ProgressReporter::new()).unwrap();
    let register = prepared.registers().get(1, 0).unwrap();

    assert_eq!(
        register.highest_scoring_pair(),
        PosePair::new(pose(0, 1), pose(1, 2))
    );
    assert_eq!(register.highest_score(), 0.95);
}

#[test]
fn ligand_without_poses_is_rejected_by_default() {
    let result = MultiAligner::from_pose_counts(&[2, 0, 2], hashed_score, config(2));
    assert!(matches!(result, Err(EngineError::EmptyPoseSet { ligand_id: 1 })));
}

#[test]
fn ligand_without_poses_stays_missing_when_allowed() {
    let permissive = MultiAlignerConfigBuilder::new()
        .max_starting_assemblies(4)
        .allow_empty_pose_sets(true)
        .build()
        .unwrap();
    let aligner = MultiAligner::from_pose_counts(&[2, 0, 2], hashed_score, permissive).unwrap();

    let result = aligner.align(&ProgressReporter::new()).unwrap();

    assert_eq!(result.pose_for(1), None);
    assert_eq!(result.missing_ligands_count(), 1);
    assert!(result.pose_for(0).is_some());
    assert!(result.pose_for(2).is_some());
}

#[test]
fn final_score_is_at_least_every_starting_assembly() {
    let aligner = MultiAligner::from_pose_counts(&[4, 3, 5, 2], hashed_score, config(3)).unwrap();
    let prepared = aligner.prepare(&ProgressReporter::new()).unwrap();

    let best_start = aligner
        .ligands()
        .iter()
        .flat_map(|ligand| ligand.poses().iter().copied())
        .map(|seed| {
            let assembly = prepared.starting_assembly(seed);
            prepared.score(&assembly).unwrap()
        })
        .fold(f64::NEG_INFINITY, f64::max);

    let result = aligner.align(&ProgressReporter::new()).unwrap();

    assert!(result.score() >= best_start);
}

#[test]
fn refining_never_lowers_an_assembly_score() {
    let aligner = MultiAligner::from_pose_counts(&[3, 3, 3], hashed_score, config(2)).unwrap();
    let prepared = aligner.prepare(&ProgressReporter::new()).unwrap();

    let combinations = (0..3)
        .cartesian_product(0..3)
        .cartesian_product(0..3)
        .map(|((a, b), c)| (a, b, c));
    for (p0, p1, p2) in combinations {
        let assembly = LigandAlignmentAssembly::from_mapping(3, [(0, p0), (1, p1), (2, p2)]);
        let before = prepared.score(&assembly).unwrap();
        let outcome = prepared.optimize_assembly(assembly).unwrap();
        assert!(outcome.score >= before);
        assert!(outcome.converged);
    }
}

#[test]
fn reassigning_the_current_pose_leaves_the_score_unchanged() {
    let aligner = MultiAligner::from_pose_counts(&[2, 2, 2], planted_table(), config(1)).unwrap();
    let prepared = aligner.prepare(&ProgressReporter::new()).unwrap();
    let mut assembly = LigandAlignmentAssembly::from_mapping(3, [(0, 0), (1, 1), (2, 0)]);
    let before = prepared.score(&assembly).unwrap();

    assembly.assign(1, 1);

    assert_eq!(prepared.score(&assembly).unwrap(), before);
    assert_eq!(assembly.missing_ligands_count(), 0);
}

#[test]
fn zero_starting_assemblies_is_rejected() {
    let built = MultiAlignerConfigBuilder::new()
        .max_starting_assemblies(0)
        .build();
    assert!(matches!(
        built,
        Err(ConfigError::InvalidParameter {
            name: "max_starting_assemblies",
            ..
        })
    ));
}

#[test]
fn matrix_lookup_is_order_independent() {
    let aligner = MultiAligner::from_pose_counts(&[2, 3], hashed_score, config(1)).unwrap();
    let prepared = aligner.prepare(&ProgressReporter::new()).unwrap();

    let alignment = prepared.alignment();

    for (a, b) in [(pose(0, 1), pose(1, 2)), (pose(0, 0), pose(1, 0))] {
        assert_eq!(alignment.get(a, b), alignment.get(b, a));
        assert_eq!(alignment.get(a, b), hashed_score(a, b).ok());
    }
}

#[test]
fn aligner_runs_with_a_config_loaded_from_toml() {
    let mut file = NamedTempFile::new().unwrap();
    let content = r#"
max-starting-assemblies = 2
num-threads = 1
max-iterations = 50
deficit-policy = "include-absent-peers"
"#;
    file.write_all(content.as_bytes()).unwrap();
    let config = MultiAlignerConfig::load(file.path()).unwrap();

    let aligner = MultiAligner::from_pose_counts(&[2, 2, 2], planted_table(), config).unwrap();
    let result = aligner.align(&ProgressReporter::new()).unwrap();

    assert!((result.score() - 2.7).abs() < 1e-12);
}

#[test]
fn skipped_incomplete_candidates_leave_the_best_start_unrefined() {
    let config = permissive_config()
        .skip_incomplete_assemblies(true)
        .build()
        .unwrap();
    let aligner = MultiAligner::from_pose_counts(&[3, 0, 3], gapped_table(), config).unwrap();
    let prepared = aligner.prepare(&ProgressReporter::new()).unwrap();
    let best_start = prepared.starting_assembly(pose(0, 2));

    let result = aligner.align(&ProgressReporter::new()).unwrap();

    assert_eq!(result.score(), 1.0);
    assert_eq!(result.assignment(), &best_start.mapping());
    assert_eq!(result.pose_for(0), Some(2));
    assert_eq!(result.pose_for(1), None);
    assert_eq!(result.pose_for(2), Some(1));
    assert_eq!(result.missing_ligands_count(), 1);
}

#[test]
fn skipping_incomplete_candidates_still_refines_complete_ones() {
    let config = MultiAlignerConfigBuilder::new()
        .max_starting_assemblies(6)
        .skip_incomplete_assemblies(true)
        .build()
        .unwrap();
    let aligner = MultiAligner::from_pose_counts(&[2, 2, 2], planted_table(), config).unwrap();

    let result = aligner.align(&ProgressReporter::new()).unwrap();

    assert!((result.score() - 2.7).abs() < 1e-12);
    assert_eq!(result.missing_ligands_count(), 0);
}

#[test]
fn absent_peers_count_as_zero_and_pull_unassigned_ligands_in() {
    let config = permissive_config()
        .deficit_policy(DeficitPolicy::IncludeAbsentPeers)
        .build()
        .unwrap();
    let aligner = MultiAligner::from_pose_counts(&[3, 0, 3, 2], sparse_planted_table(), config)
        .unwrap();
    let prepared = aligner.prepare(&ProgressReporter::new()).unwrap();
    let partial = LigandAlignmentAssembly::from_mapping(4, [(0, 2), (2, 1)]);

    let outcome = prepared.optimize_assembly(partial).unwrap();

    assert!((outcome.score - 2.7).abs() < 1e-12);
    assert_eq!(outcome.assembly.pose_of(3), Some(0));
    assert_eq!(outcome.assembly.missing_ligands_count(), 1);
    assert_eq!(outcome.swaps, 1);
    assert!(outcome.converged);
}

#[test]
fn skipped_absent_peers_leave_unassigned_ligands_alone() {
    let config = permissive_config()
        .deficit_policy(DeficitPolicy::SkipAbsentPeers)
        .build()
        .unwrap();
    let aligner = MultiAligner::from_pose_counts(&[3, 0, 3, 2], sparse_planted_table(), config)
        .unwrap();
    let prepared = aligner.prepare(&ProgressReporter::new()).unwrap();
    let partial = LigandAlignmentAssembly::from_mapping(4, [(0, 2), (2, 1)]);

    let outcome = prepared.optimize_assembly(partial).unwrap();

    assert!((outcome.score - 0.9).abs() < 1e-12);
    assert_eq!(outcome.assembly.pose_of(3), None);
    assert_eq!(outcome.assembly.missing_ligands_count(), 2);
    assert_eq!(outcome.swaps, 0);
}

#[test]
fn align_with_absent_peers_included_keeps_only_the_empty_ligand_missing() {
    let config = permissive_config()
        .deficit_policy(DeficitPolicy::IncludeAbsentPeers)
        .build()
        .unwrap();
    let aligner = MultiAligner::from_pose_counts(&[3, 0, 3, 2], sparse_planted_table(), config)
        .unwrap();

    let result = aligner.align(&ProgressReporter::new()).unwrap();

    assert!((result.score() - 2.7).abs() < 1e-12);
    assert_eq!(result.pose_for(0), Some(2));
    assert_eq!(result.pose_for(1), None);
    assert_eq!(result.pose_for(2), Some(1));
    assert_eq!(result.pose_for(3), Some(0));
    assert_eq!(result.missing_ligands_count(), 1);
}
