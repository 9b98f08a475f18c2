use crate::core::models::ids::{LigandId, PoseId};
use crate::engine::assembly::LigandAlignmentAssembly;
use crate::engine::config::DeficitPolicy;
use crate::engine::error::EngineError;
use crate::engine::registers::PoseRegisterCollection;
use crate::engine::scorer::AssemblyScorer;
use tracing::{debug, trace, warn};

/// Outcome of a single [`LocalSearch::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchStep {
    /// A pose swap strictly raised the assembly score; every ligand is available again.
    Swapped {
        ligand_id: LigandId,
        pose_id: PoseId,
        score: f64,
    },
    /// No alternative pose of the worst ligand improved the score; it is now unavailable.
    Exhausted { ligand_id: LigandId },
    /// No available ligand has a positive score deficit.
    Converged,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub assembly: LigandAlignmentAssembly,
    pub score: f64,
    pub steps: usize,
    pub swaps: usize,
    /// `false` when the iteration cap stopped the search before a local optimum.
    pub converged: bool,
}

/// First-improvement local search over one assembly.
///
/// Each step picks the available ligand with the largest score deficit and tries its other
/// poses in index order on a private copy of the assembly. The first pose that strictly raises
/// the total score is kept and all ligands become available again; if none does, the ligand is
/// marked unavailable. The search owns its assembly and availability flags, so independent
/// searches can run on different workers without synchronisation.
pub struct LocalSearch<'a> {
    scorer: AssemblyScorer<'a>,
    registers: &'a PoseRegisterCollection,
    policy: DeficitPolicy,
    assembly: LigandAlignmentAssembly,
    score: f64,
    available: Vec<bool>,
}

impl<'a> LocalSearch<'a> {
    pub fn new(
        scorer: AssemblyScorer<'a>,
        registers: &'a PoseRegisterCollection,
        policy: DeficitPolicy,
        assembly: LigandAlignmentAssembly,
    ) -> Result<Self, EngineError> {
        let score = scorer.score(&assembly)?;
        let available = vec![true; scorer.ligands().len()];
        Ok(Self {
            scorer,
            registers,
            policy,
            assembly,
            score,
            available,
        })
    }

    #[inline]
    pub fn score(&self) -> f64 {
        self.score
    }

    #[inline]
    pub fn assembly(&self) -> &LigandAlignmentAssembly {
        &self.assembly
    }

    pub fn is_available(&self, ligand_id: LigandId) -> bool {
        self.available.get(ligand_id).copied().unwrap_or(false)
    }

    /// The available ligand with the largest positive deficit, lowest id on ties.
    fn worst_available_ligand(&self) -> Result<Option<(LigandId, f64)>, EngineError> {
        let Some(max_ligand_id) = self.scorer.ligands().len().checked_sub(1) else {
            return Ok(None);
        };

        let mut worst: Option<(LigandId, f64)> = None;
        let mut max_deficit = 0.0;
        for ligand in self.scorer.ligands() {
            if !self.is_available(ligand.id()) {
                continue;
            }
            let deficit = self.scorer.score_deficit(
                ligand.id(),
                max_ligand_id,
                &self.assembly,
                self.registers,
                self.policy,
            )?;
            if deficit > max_deficit {
                max_deficit = deficit;
                worst = Some((ligand.id(), deficit));
            }
        }
        Ok(worst)
    }

    pub fn step(&mut self) -> Result<SearchStep, EngineError> {
        let Some((ligand_id, deficit)) = self.worst_available_ligand()? else {
            return Ok(SearchStep::Converged);
        };
        let ligand = &self.scorer.ligands()[ligand_id];
        let current_pose = self.assembly.pose_of(ligand_id);

        for pose_id in ligand.pose_ids() {
            if Some(pose_id) == current_pose {
                continue;
            }
            let mut trial = self.assembly.clone();
            trial.assign(ligand_id, pose_id);
            let trial_score = self.scorer.score(&trial)?;

            if trial_score > self.score {
                trace!(
                    ligand = ligand_id,
                    pose = pose_id,
                    deficit,
                    old_score = self.score,
                    new_score = trial_score,
                    "Accepted pose swap."
                );
                self.assembly = trial;
                self.score = trial_score;
                self.available.fill(true);
                return Ok(SearchStep::Swapped {
                    ligand_id,
                    pose_id,
                    score: trial_score,
                });
            }
        }

        self.available[ligand_id] = false;
        Ok(SearchStep::Exhausted { ligand_id })
    }

    /// Steps until a local optimum, or until `max_steps` steps have been taken.
    pub fn run(mut self, max_steps: Option<usize>) -> Result<SearchOutcome, EngineError> {
        let initial_score = self.score;
        let mut steps = 0;
        let mut swaps = 0;
        let mut converged = false;

        while max_steps.is_none_or(|cap| steps < cap) {
            match self.step()? {
                SearchStep::Converged => {
                    converged = true;
                    break;
                }
                SearchStep::Swapped { .. } => swaps += 1,
                SearchStep::Exhausted { .. } => {}
            }
            steps += 1;
        }

        if !converged {
            warn!(
                steps,
                score = self.score,
                "Local search hit its iteration cap before reaching a local optimum."
            );
        }
        debug!(
            initial_score,
            final_score = self.score,
            steps,
            swaps,
            "Local search finished."
        );

        Ok(SearchOutcome {
            assembly: self.assembly,
            score: self.score,
            steps,
            swaps,
            converged,
        })
    }
}
