use crate::core::models::ids::{LigandId, PoseId, UniquePoseId};
use crate::core::models::ligand::Ligand;
use crate::core::scoring::PoseOracle;
use crate::engine::alignment::PairwiseAlignment;
use crate::engine::assembly::LigandAlignmentAssembly;
use crate::engine::config::MultiAlignerConfig;
use crate::engine::error::EngineError;
use crate::engine::pool::WorkerPool;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::registers::{PoseRegisterCollection, build_pose_registers};
use crate::engine::scorer::AssemblyScorer;
use crate::engine::state::{ScoredAssembly, StartingAssemblyPool};
use crate::engine::tasks::local_search::{LocalSearch, SearchOutcome};
use crate::engine::tasks::{pairwise_scores, starting_assembly};
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The best assembly found by [`MultiAligner::align`], ready for an output writer.
#[derive(Debug, Clone)]
pub struct MultiAlignerResult {
    score: f64,
    assignment: BTreeMap<LigandId, PoseId>,
    missing_ligands_count: usize,
    ligands: Vec<Ligand>,
}

impl MultiAlignerResult {
    #[inline]
    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn assignment(&self) -> &BTreeMap<LigandId, PoseId> {
        &self.assignment
    }

    pub fn pose_for(&self, ligand_id: LigandId) -> Option<PoseId> {
        self.assignment.get(&ligand_id).copied()
    }

    pub fn missing_ligands_count(&self) -> usize {
        self.missing_ligands_count
    }

    pub fn ligands(&self) -> &[Ligand] {
        &self.ligands
    }

    /// Each assigned ligand with its chosen pose, in ligand id order.
    pub fn chosen_poses(&self) -> impl Iterator<Item = (&Ligand, PoseId)> + '_ {
        self.assignment
            .iter()
            .filter_map(|(&id, &pose)| self.ligands.get(id).map(|ligand| (ligand, pose)))
    }
}

/// Score matrix and pose registers, built once and shared read-only by every search.
pub struct PreparedAlignment<'a> {
    ligands: &'a [Ligand],
    oracle: &'a dyn PoseOracle,
    config: &'a MultiAlignerConfig,
    alignment: PairwiseAlignment,
    registers: PoseRegisterCollection,
}

impl PreparedAlignment<'_> {
    pub fn alignment(&self) -> &PairwiseAlignment {
        &self.alignment
    }

    pub fn registers(&self) -> &PoseRegisterCollection {
        &self.registers
    }

    pub fn scorer(&self) -> AssemblyScorer<'_> {
        AssemblyScorer::new(&self.alignment, self.ligands, self.oracle)
    }

    pub fn score(&self, assembly: &LigandAlignmentAssembly) -> Result<f64, EngineError> {
        self.scorer().score(assembly)
    }

    pub fn starting_assembly(&self, seed: UniquePoseId) -> LigandAlignmentAssembly {
        starting_assembly::generate(seed, &self.registers, self.ligands)
    }

    /// Refines one assembly by local search, honouring the configured iteration cap.
    pub fn optimize_assembly(
        &self,
        assembly: LigandAlignmentAssembly,
    ) -> Result<SearchOutcome, EngineError> {
        if assembly.num_ligands() != self.ligands.len() {
            return Err(EngineError::InvalidInput(format!(
                "assembly covers {} ligands but {} are being aligned",
                assembly.num_ligands(),
                self.ligands.len()
            )));
        }
        LocalSearch::new(
            self.scorer(),
            &self.registers,
            self.config.deficit_policy,
            assembly,
        )?
        .run(self.config.max_iterations)
    }

    /// Stores any score the assembly's pose pairs are still missing from the matrix.
    pub fn ensure_for_assembly(
        &mut self,
        assembly: &LigandAlignmentAssembly,
    ) -> Result<usize, EngineError> {
        self.alignment.ensure_for_assembly(assembly, self.oracle)
    }
}

/// Aligns ligands by picking one pose each so that the summed pairwise compatibility is high.
///
/// Owns its worker pool; matrix construction and local search both run on it.
pub struct MultiAligner<O: PoseOracle> {
    ligands: Vec<Ligand>,
    oracle: O,
    config: MultiAlignerConfig,
    pool: WorkerPool,
}

impl<O: PoseOracle> MultiAligner<O> {
    pub fn new(
        ligands: Vec<Ligand>,
        oracle: O,
        config: MultiAlignerConfig,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        validate_ligands(&ligands, &config)?;

        let pool = WorkerPool::new(config.num_threads)?;

        Ok(Self {
            ligands,
            oracle,
            config,
            pool,
        })
    }

    /// Builds ligands with dense ids from per-ligand pose (conformer) counts.
    pub fn from_pose_counts(
        pose_counts: &[usize],
        oracle: O,
        config: MultiAlignerConfig,
    ) -> Result<Self, EngineError> {
        let ligands = pose_counts
            .iter()
            .enumerate()
            .map(|(id, &count)| Ligand::new(id, count))
            .collect();
        Self::new(ligands, oracle, config)
    }

    pub fn ligands(&self) -> &[Ligand] {
        &self.ligands
    }

    pub fn config(&self) -> &MultiAlignerConfig {
        &self.config
    }

    /// Builds the pairwise score matrix and the pose registers.
    #[instrument(skip_all, name = "alignment_preparation")]
    pub fn prepare(
        &self,
        reporter: &ProgressReporter,
    ) -> Result<PreparedAlignment<'_>, EngineError> {
        reporter.report(Progress::PhaseStart {
            name: "Pairwise Scoring",
        });
        let alignment = pairwise_scores::run(&self.ligands, &self.oracle, &self.pool, reporter)?;
        reporter.report(Progress::PhaseFinish);

        info!(
            ligands = self.ligands.len(),
            scores = alignment.len(),
            "Pairwise scores ready, building pose registers."
        );

        reporter.report(Progress::PhaseStart {
            name: "Pose Registers",
        });
        let registers = build_pose_registers(&alignment, &self.ligands);
        reporter.report(Progress::PhaseFinish);

        Ok(PreparedAlignment {
            ligands: &self.ligands,
            oracle: &self.oracle,
            config: &self.config,
            alignment,
            registers,
        })
    }

    #[instrument(skip_all, name = "multi_alignment_workflow")]
    pub fn align(&self, reporter: &ProgressReporter) -> Result<MultiAlignerResult, EngineError> {
        // === Phase 1 & 2: Score matrix and pose registers ===
        let prepared = self.prepare(reporter)?;

        // === Phase 3: Seed starting assemblies, keep the best K ===
        let candidates = self.seed_starting_assemblies(&prepared, reporter)?;

        // === Phase 4: Refine every candidate in parallel ===
        let best = self.refine_candidates(&prepared, candidates, reporter)?;

        info!(score = best.score, "Alignment optimization finished.");
        Ok(MultiAlignerResult {
            score: best.score,
            assignment: best.assembly.mapping(),
            missing_ligands_count: best.assembly.missing_ligands_count(),
            ligands: self.ligands.clone(),
        })
    }

    fn seed_starting_assemblies(
        &self,
        prepared: &PreparedAlignment<'_>,
        reporter: &ProgressReporter,
    ) -> Result<Vec<ScoredAssembly>, EngineError> {
        reporter.report(Progress::PhaseStart {
            name: "Starting Assemblies",
        });

        let scorer = prepared.scorer();
        let mut candidate_pool = StartingAssemblyPool::new(self.config.max_starting_assemblies);
        let mut generated = 0usize;

        for ligand in &self.ligands {
            for &seed in ligand.poses() {
                let assembly = prepared.starting_assembly(seed);
                let score = scorer.score(&assembly)?;
                generated += 1;
                if candidate_pool.offer(ScoredAssembly::new(assembly, score)) {
                    debug!(seed = %seed, score, "Kept starting assembly.");
                }
            }
        }

        reporter.report(Progress::PhaseFinish);

        if candidate_pool.is_empty() {
            return Err(EngineError::NoStartingAssembly);
        }
        info!(
            generated,
            kept = candidate_pool.len(),
            "Starting assemblies generated."
        );
        Ok(candidate_pool.into_ranked())
    }

    fn refine_candidates(
        &self,
        prepared: &PreparedAlignment<'_>,
        candidates: Vec<ScoredAssembly>,
        reporter: &ProgressReporter,
    ) -> Result<ScoredAssembly, EngineError> {
        reporter.report(Progress::PhaseStart {
            name: "Local Search",
        });
        reporter.report(Progress::TaskStart {
            total_steps: candidates.len() as u64,
        });
        info!(
            count = candidates.len(),
            "Starting optimization of alignment assemblies."
        );

        let best = Mutex::new(candidates[0].clone());
        let skip_incomplete = self.config.skip_incomplete_assemblies;

        self.pool.install(|| {
            #[cfg(not(feature = "parallel"))]
            let iterator = candidates.iter();

            #[cfg(feature = "parallel")]
            let iterator = candidates.par_iter();

            iterator.try_for_each(|candidate| -> Result<(), EngineError> {
                if skip_incomplete && !candidate.assembly.is_complete() {
                    warn!(
                        missing = candidate.assembly.missing_ligands_count(),
                        "Skipping starting assembly with missing ligands."
                    );
                    reporter.report(Progress::TaskIncrement);
                    return Ok(());
                }

                let outcome = prepared.optimize_assembly(candidate.assembly.clone())?;
                let final_score = prepared.score(&outcome.assembly)?;
                debug!(
                    before = candidate.score,
                    after = final_score,
                    swaps = outcome.swaps,
                    assigned = outcome.assembly.assigned_count(),
                    "Refined starting assembly."
                );

                {
                    let mut current_best = best.lock().map_err(|_| best_lock_poisoned())?;
                    if final_score > current_best.score {
                        *current_best = ScoredAssembly::new(outcome.assembly, final_score);
                        reporter.report(Progress::BestScoreImproved { score: final_score });
                    }
                }
                reporter.report(Progress::TaskIncrement);
                Ok(())
            })
        })?;

        reporter.report(Progress::TaskFinish);
        reporter.report(Progress::PhaseFinish);

        best.into_inner().map_err(|_| best_lock_poisoned())
    }
}

fn best_lock_poisoned() -> EngineError {
    EngineError::Internal("best assembly lock poisoned".into())
}

fn validate_ligands(ligands: &[Ligand], config: &MultiAlignerConfig) -> Result<(), EngineError> {
    if ligands.is_empty() {
        return Err(EngineError::InvalidInput(
            "at least one ligand is required".to_string(),
        ));
    }
    for (expected, ligand) in ligands.iter().enumerate() {
        if ligand.id() != expected {
            return Err(EngineError::NonDenseLigandIds {
                expected,
                actual: ligand.id(),
            });
        }
        if ligand.num_poses() == 0 {
            if !config.allow_empty_pose_sets {
                return Err(EngineError::EmptyPoseSet {
                    ligand_id: ligand.id(),
                });
            }
            warn!(
                ligand = ligand.id(),
                "Ligand has no poses and will stay missing from every assembly."
            );
        }
    }
    Ok(())
}
