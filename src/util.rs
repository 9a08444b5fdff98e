/// Share of `part` in `total` as a whole percentage, rounded to nearest.
/// An empty total is 0%.
pub fn percentage(part: usize, total: usize) -> u16 {
    match total {
        positive if positive > 0 => {
            let ratio = part.min(total) as f64 / total as f64;
            (ratio * 100.0).round() as u16
        }
        _ => 0,
    }
}
