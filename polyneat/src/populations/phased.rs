use crate::parameters::Parameters;

use serde::{Deserialize, Serialize};

/// The structural-search regime the population is currently in.
/// Mutation operators are expected to read it: no structural
/// additions while simplifying, no removals while complexifying.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchMode {
    /// Structural growth is allowed.
    Complexifying,
    /// Structure is being pruned back towards the complexity floor.
    Simplifying,
    /// Both directions at once; the regime used when phased
    /// searching is disabled.
    Blended,
}

/// Tracks mean population complexity (MPC, the mean link count) and
/// toggles between the complexifying and simplifying regimes.
///
/// Complexifying ends when complexity has risen well past the base
/// level while the whole population stagnates; simplifying ends
/// when complexity has stopped dropping for long enough, at which
/// point the current level becomes the new base.
#[derive(Clone, Debug)]
pub(super) struct PhasedSearch {
    pub(super) mode: SearchMode,
    pub(super) base_mpc: f64,
    pub(super) current_mpc: f64,
    pub(super) old_mpc: f64,
    pub(super) gens_since_mpc_last_changed: usize,
}

impl PhasedSearch {
    pub(super) fn new(params: &Parameters) -> PhasedSearch {
        PhasedSearch {
            mode: if params.phased_searching {
                SearchMode::Complexifying
            } else {
                SearchMode::Blended
            },
            base_mpc: 0.0,
            current_mpc: 0.0,
            old_mpc: 0.0,
            gens_since_mpc_last_changed: 0,
        }
    }

    /// Establishes the initial complexity levels from the founding
    /// population.
    pub(super) fn prime(&mut self, mpc: f64) {
        self.current_mpc = mpc;
        self.base_mpc = mpc;
        self.old_mpc = mpc;
    }

    /// Feeds this generation's MPC and global stagnation into the
    /// state machine. Returns true when a phase transition occurred
    /// and all species ages must be reset.
    pub(super) fn update(
        &mut self,
        mpc: f64,
        global_stagnation: usize,
        params: &Parameters,
    ) -> bool {
        self.current_mpc = mpc;
        if !params.phased_searching {
            return false;
        }

        if self.mode == SearchMode::Simplifying {
            if self.current_mpc < self.old_mpc {
                self.old_mpc = self.current_mpc;
                self.gens_since_mpc_last_changed = 0;
            } else {
                self.gens_since_mpc_last_changed += 1;
            }
        }

        match self.mode {
            SearchMode::Complexifying => {
                if self.current_mpc > self.base_mpc + params.simplifying_phase_mpc_threshold
                    && global_stagnation > params.simplifying_phase_stagnation_threshold
                {
                    self.mode = SearchMode::Simplifying;
                    self.gens_since_mpc_last_changed = 0;
                    self.old_mpc = f64::INFINITY;
                    return true;
                }
            }
            SearchMode::Simplifying => {
                if self.gens_since_mpc_last_changed > params.complexity_floor_generations {
                    self.mode = SearchMode::Complexifying;
                    self.base_mpc = self.current_mpc;
                    return true;
                }
            }
            SearchMode::Blended => {}
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phased_params() -> Parameters {
        Parameters {
            phased_searching: true,
            simplifying_phase_mpc_threshold: 10.0,
            simplifying_phase_stagnation_threshold: 5,
            complexity_floor_generations: 3,
            ..Parameters::default()
        }
    }

    #[test]
    fn blended_never_transitions() {
        let params = Parameters {
            phased_searching: false,
            ..phased_params()
        };
        let mut phased = PhasedSearch::new(&params);
        phased.prime(1.0);
        assert_eq!(phased.mode, SearchMode::Blended);
        assert!(!phased.update(1000.0, 1000, &params));
        assert_eq!(phased.mode, SearchMode::Blended);
    }

    #[test]
    fn complexifying_holds_until_bloat_and_stagnation_coincide() {
        let params = phased_params();
        let mut phased = PhasedSearch::new(&params);
        phased.prime(2.0);

        // Bloated but not stagnated.
        assert!(!phased.update(20.0, 2, &params));
        assert_eq!(phased.mode, SearchMode::Complexifying);
        // Stagnated but not bloated.
        assert!(!phased.update(5.0, 50, &params));
        assert_eq!(phased.mode, SearchMode::Complexifying);
        // Both at once.
        assert!(phased.update(20.0, 50, &params));
        assert_eq!(phased.mode, SearchMode::Simplifying);
        assert_eq!(phased.old_mpc, f64::INFINITY);
        assert_eq!(phased.gens_since_mpc_last_changed, 0);
    }

    #[test]
    fn simplifying_ends_at_the_complexity_floor() {
        let params = phased_params();
        let mut phased = PhasedSearch::new(&params);
        phased.prime(2.0);
        assert!(phased.update(20.0, 50, &params));

        // Complexity keeps dropping: the floor counter stays reset.
        assert!(!phased.update(18.0, 50, &params));
        assert!(!phased.update(15.0, 50, &params));
        assert_eq!(phased.gens_since_mpc_last_changed, 0);

        // Complexity flatlines for longer than the floor allows.
        for _ in 0..params.complexity_floor_generations {
            assert!(!phased.update(15.0, 50, &params));
        }
        assert!(phased.update(15.0, 50, &params));
        assert_eq!(phased.mode, SearchMode::Complexifying);
        // The floor level becomes the new base.
        assert_eq!(phased.base_mpc, 15.0);
    }
}
