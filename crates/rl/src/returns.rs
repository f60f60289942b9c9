/// Discounted return `Σ gamma^i · rewards[i]` of a whole episode.
///
/// REINFORCE as used here weights every timestep with this single value
/// rather than the reward-to-go from that step.
pub fn discounted_return(rewards: &[f32], gamma: f32) -> f32 {
    let mut discount = 1.0;
    let mut total = 0.0;
    for reward in rewards {
        total += discount * reward;
        discount *= gamma;
    }
    total
}
