/// Reduces the exchanged sequences to the positions where sender and
/// receiver bases agree. Deterministic and order-preserving, so either party
/// may compute it and commit an identical result. All inputs are truncated
/// to their common minimum length first; zero agreement yields empty output,
/// not a failure.
pub fn sift(
    sender_bases: &[bool],
    receiver_bases: &[bool],
    receiver_results: &[bool],
) -> (Vec<bool>, Vec<usize>) {
    let n = sender_bases
        .len()
        .min(receiver_bases.len())
        .min(receiver_results.len());
    let mut sifted = Vec::new();
    let mut matching = Vec::new();
    for i in 0..n {
        if sender_bases[i] == receiver_bases[i] {
            sifted.push(receiver_results[i]);
            matching.push(i);
        }
    }
    (sifted, matching)
}
