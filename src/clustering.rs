use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    data::{Jet, Particle},
    ragged::Ragged,
    selection::{FinalState, Selection},
    substructure::{girth, lesub},
    utils::enums::JetAlgorithm,
    JetsubError, JetsubResult,
};

/// The parameters handed to a [`ClusteringOracle`].
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JetDefinition {
    /// The recombination algorithm.
    pub algorithm: JetAlgorithm,
    /// The jet radius parameter $`R`$.
    pub radius: f64,
    /// The minimum transverse momentum of a jet.
    pub min_pt: f64,
    /// Whether [`cluster_jets`] also computes girth and lesub for every jet.
    pub substructure: bool,
}

impl Default for JetDefinition {
    fn default() -> Self {
        Self {
            algorithm: JetAlgorithm::default(),
            radius: 0.4,
            min_pt: 10.0,
            substructure: true,
        }
    }
}

impl JetDefinition {
    /// Create a new [`Default`] [`JetDefinition`] (anti-$`k_T`$, $`R = 0.4`$,
    /// $`p_T > 10`$ GeV, with substructure).
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the clustering algorithm.
    pub fn algorithm(mut self, algorithm: JetAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the jet radius.
    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Set the minimum jet transverse momentum.
    pub fn min_pt(mut self, min_pt: f64) -> Self {
        self.min_pt = min_pt;
        self
    }

    /// Enable or disable the substructure observables in [`cluster_jets`].
    pub fn substructure(mut self, substructure: bool) -> Self {
        self.substructure = substructure;
        self
    }
}

/// An external jet-clustering algorithm.
///
/// Given a depth 1 array of final-state particles per event, an implementation returns a depth
/// 1 array of jets per event and an aligned depth 2 array holding the constituents of each jet.
/// Constituent lists may be empty. Implementations should report their own failures as
/// [`JetsubError::Clustering`].
///
/// Any closure with the signature of [`ClusteringOracle::cluster`] is an oracle.
pub trait ClusteringOracle {
    /// Cluster every event into jets.
    fn cluster(
        &self,
        particles: &Ragged<Particle>,
        definition: &JetDefinition,
    ) -> JetsubResult<(Ragged<Jet>, Ragged<Particle>)>;
}

impl<F> ClusteringOracle for F
where
    F: Fn(&Ragged<Particle>, &JetDefinition) -> JetsubResult<(Ragged<Jet>, Ragged<Particle>)>,
{
    fn cluster(
        &self,
        particles: &Ragged<Particle>,
        definition: &JetDefinition,
    ) -> JetsubResult<(Ragged<Jet>, Ragged<Particle>)> {
        self(particles, definition)
    }
}

/// The output of [`cluster_jets`].
#[derive(Clone, Debug, PartialEq)]
pub struct ClusteredEvents {
    /// Jets per event.
    pub jets: Ragged<Jet>,
    /// Constituents per jet per event, aligned with `jets`.
    pub constituents: Ragged<Particle>,
    /// The girth of every jet, if requested.
    pub girth: Option<Ragged<f64>>,
    /// The lesub of every jet, if requested.
    pub lesub: Option<Ragged<Option<f64>>>,
}

/// Cluster the final-state particles of every event with `oracle` and, if the definition asks
/// for it, compute the substructure of every jet.
///
/// # Errors
///
/// Returns [`JetsubError::LevelMismatch`] if `particles` is not a depth 1 array of events or
/// the oracle returns jets of the wrong depth, [`JetsubError::ShapeMismatch`] if the oracle's
/// jets and constituents are not aligned with each other and with the events, and any error
/// the oracle itself reports.
pub fn cluster_jets<O>(
    particles: &Ragged<Particle>,
    oracle: &O,
    definition: &JetDefinition,
) -> JetsubResult<ClusteredEvents>
where
    O: ClusteringOracle + ?Sized,
{
    if particles.depth() != 1 {
        return Err(JetsubError::LevelMismatch {
            level: 1,
            depth: particles.depth(),
        });
    }
    let final_state = Selection::new(FinalState).apply(particles);
    debug!(
        "Clustering {} final-state particles in {} events with {} (R = {}, pt > {})",
        final_state.n_leaves(),
        final_state.len(),
        definition.algorithm,
        definition.radius,
        definition.min_pt
    );
    let (jets, constituents) = oracle.cluster(&final_state, definition)?;
    if jets.depth() != 1 {
        return Err(JetsubError::LevelMismatch {
            level: 1,
            depth: jets.depth(),
        });
    }
    if jets.len() != particles.len() {
        return Err(JetsubError::ShapeMismatch {
            context: "cluster_jets (events)".to_string(),
            left: particles.describe_shape(),
            right: jets.describe_shape(),
        });
    }
    jets.check_parent_of(&constituents, "cluster_jets (constituents)")?;
    debug!("Clustered {} jets", jets.n_leaves());
    let (girth, lesub) = if definition.substructure {
        (
            Some(girth(&jets, &constituents)?),
            Some(lesub(&constituents)?),
        )
    } else {
        (None, None)
    };
    Ok(ClusteredEvents {
        jets,
        constituents,
        girth,
        lesub,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::{
        data::{test_events, test_jets},
        utils::vectors::Vec4,
    };

    type Clustered = JetsubResult<(Ragged<Jet>, Ragged<Particle>)>;

    /// Every particle above the threshold becomes a jet of its own.
    struct OneJetPerParticle;

    impl ClusteringOracle for OneJetPerParticle {
        fn cluster(&self, particles: &Ragged<Particle>, definition: &JetDefinition) -> Clustered {
            let kept = particles.filter(|p| p.p4.pt() > definition.min_pt);
            Ok((kept.map(|p| Jet::new(p.p4)), kept.singletons()))
        }
    }

    #[test]
    fn test_jet_definition_defaults() {
        let definition = JetDefinition::new();
        assert_eq!(definition.algorithm, JetAlgorithm::AntiKt);
        assert_eq!(definition.radius, 0.4);
        assert_eq!(definition.min_pt, 10.0);
        assert!(definition.substructure);
        let custom = JetDefinition::new()
            .algorithm(JetAlgorithm::CambridgeAachen)
            .radius(0.8)
            .min_pt(200.0)
            .substructure(false);
        assert_eq!(custom.algorithm, JetAlgorithm::CambridgeAachen);
        assert_eq!(custom.radius, 0.8);
        assert_eq!(custom.min_pt, 200.0);
        assert!(!custom.substructure);
    }

    #[test]
    fn test_jet_definition_serde() {
        let definition = JetDefinition::new().algorithm(JetAlgorithm::Kt).radius(1.0);
        let json = serde_json::to_string(&definition).unwrap();
        let parsed: JetDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, definition);
        let partial: JetDefinition = serde_json::from_str(r#"{"radius": 0.8}"#).unwrap();
        assert_eq!(partial, JetDefinition::new().radius(0.8));
    }

    #[test]
    fn test_cluster_jets_with_substructure() {
        let oracle = |particles: &Ragged<Particle>, _: &JetDefinition| -> Clustered {
            assert_eq!(particles.len(), 3);
            Ok(test_jets())
        };
        let clustered = cluster_jets(&test_events(), &oracle, &JetDefinition::new()).unwrap();
        let (jets, constituents) = test_jets();
        assert_eq!(clustered.jets, jets);
        assert_eq!(clustered.constituents, constituents);
        assert_eq!(clustered.girth, Some(girth(&jets, &constituents).unwrap()));
        let lesub = clustered.lesub.unwrap();
        assert!(lesub.same_shape(&jets));
        assert_relative_eq!(lesub.content()[0].unwrap(), 2.0, epsilon = 1e-12);
        assert_eq!(lesub.content()[1], None);
    }

    #[test]
    fn test_cluster_jets_only_sees_final_state() {
        let oracle = |particles: &Ragged<Particle>, definition: &JetDefinition| -> Clustered {
            assert!(particles.iter().all(|p| p.is_final));
            OneJetPerParticle.cluster(particles, definition)
        };
        let definition = JetDefinition::new().min_pt(0.0).substructure(false);
        let clustered = cluster_jets(&test_events(), &oracle, &definition).unwrap();
        assert_eq!(clustered.jets.list_lengths().unwrap().content(), &[3, 0, 3]);
        assert_eq!(clustered.girth, None);
        assert_eq!(clustered.lesub, None);
    }

    #[test]
    fn test_single_constituent_jets() {
        let definition = JetDefinition::new().min_pt(5.0);
        let clustered = cluster_jets(&test_events(), &OneJetPerParticle, &definition).unwrap();
        assert_eq!(clustered.jets.list_lengths().unwrap().content(), &[0, 0, 3]);
        let girths = clustered.girth.unwrap();
        assert!(girths.iter().all(|&g| g == 0.0));
        assert!(clustered.lesub.unwrap().iter().all(Option::is_none));
    }

    #[test]
    fn test_misaligned_oracle_is_rejected() {
        let dropped_event = |particles: &Ragged<Particle>, _: &JetDefinition| -> Clustered {
            let jets = Ragged::from_lists(vec![vec![]; particles.len() - 1]);
            let constituents = Ragged::from_nested(vec![vec![]; particles.len() - 1]);
            Ok((jets, constituents))
        };
        assert!(matches!(
            cluster_jets(&test_events(), &dropped_event, &JetDefinition::new()),
            Err(JetsubError::ShapeMismatch { .. })
        ));
        let missing_constituents = |particles: &Ragged<Particle>, _: &JetDefinition| -> Clustered {
            let jets = Ragged::from_lists(vec![vec![Jet::new(Vec4::default())]; particles.len()]);
            let constituents = Ragged::from_nested(vec![vec![]; particles.len()]);
            Ok((jets, constituents))
        };
        assert!(matches!(
            cluster_jets(&test_events(), &missing_constituents, &JetDefinition::new()),
            Err(JetsubError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_oracle_failure_propagates() {
        let failing = |_: &Ragged<Particle>, _: &JetDefinition| -> Clustered {
            Err(JetsubError::Clustering("no particles to seed".to_string()))
        };
        assert_eq!(
            cluster_jets(&test_events(), &failing, &JetDefinition::new()),
            Err(JetsubError::Clustering("no particles to seed".to_string()))
        );
    }

    #[test]
    fn test_events_must_be_lists() {
        let flat = Ragged::flat(vec![Particle::new(Vec4::default(), 211, true)]);
        assert!(matches!(
            cluster_jets(&flat, &OneJetPerParticle, &JetDefinition::new()),
            Err(JetsubError::LevelMismatch { level: 1, depth: 0 })
        ));
    }
}
