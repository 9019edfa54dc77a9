use data_loader::InteractionDataset;
use std::path::Path;
use std::time::Instant;

fn main() {
    let path = Path::new("data/interactions.csv");

    println!("Loading interaction log...\n");

    let start = Instant::now();
    let dataset = InteractionDataset::load_from_file(path)
        .expect("Failed to load interactions");
    let matrix = dataset.to_matrix().expect("Failed to build matrix");
    let elapsed = start.elapsed();

    let (users, videos, records) = dataset.counts();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Users: {}", users);
    println!("Videos: {}", videos);
    println!("User-video pairs: {}", records);
    println!("Stored matrix entries: {}", matrix.nnz());
    println!("\nPerformance: {:.0} pairs/second",
             records as f64 / elapsed.as_secs_f64());
}
