use rand::Rng;
use rand::seq::SliceRandom;
use wolf_core::model::Agent;

/// Strongest village agent first if still undivined, then a random undivined
/// agent, then self.
pub fn choose_divination_target<R: Rng + ?Sized>(
    strongest_village: Option<Agent>,
    not_divined: &[Agent],
    me: Agent,
    rng: &mut R,
) -> Agent {
    if let Some(strongest) = strongest_village {
        if strongest != me && not_divined.contains(&strongest) {
            return strongest;
        }
    }
    not_divined
        .iter()
        .copied()
        .filter(|agent| *agent != me)
        .collect::<Vec<_>>()
        .choose(rng)
        .copied()
        .unwrap_or(me)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn prefers_strongest_village_agent() {
        let mut rng = StdRng::seed_from_u64(0);
        let pool = [Agent::new(2), Agent::new(3), Agent::new(4)];
        let target = choose_divination_target(Some(Agent::new(3)), &pool, Agent::new(1), &mut rng);
        assert_eq!(target, Agent::new(3));
    }

    #[test]
    fn random_when_strongest_already_divined() {
        let mut rng = StdRng::seed_from_u64(0);
        let pool = [Agent::new(2), Agent::new(4)];
        let target = choose_divination_target(Some(Agent::new(3)), &pool, Agent::new(1), &mut rng);
        assert!(pool.contains(&target));
    }

    #[test]
    fn empty_pool_divines_self() {
        let mut rng = StdRng::seed_from_u64(0);
        let target = choose_divination_target(None, &[], Agent::new(1), &mut rng);
        assert_eq!(target, Agent::new(1));
    }
}
