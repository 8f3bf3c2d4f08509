use packed_column::{FixedWidth, PackedError, PackedVec, SearchStrategy};

fn main() {
    println!("=== Packed Column Examples ===\n");

    // Example 1: Storing 17-bit identifiers
    let _ = example_identifiers();

    // Example 2: Searching
    let _ = example_search();

    // Example 3: Memory comparison
    let _ = example_memory_savings();
}

fn example_identifiers() -> Result<(), PackedError> {
    println!("Example 1: Storing 17-bit identifiers");

    let mut ids = FixedWidth::<17>::new(4)?;
    ids.push(100_000)?;
    ids.push(7)?;
    ids.push(0xFFFF_FFFF)?; // truncated to 0x1FFFF
    ids.push(42)?;

    println!("  Stored {} ids", ids.len());
    for i in 0..ids.len() {
        println!("  Id {}: {:?}", i, ids.get(i));
    }
    if let Err(e) = ids.push(1) {
        println!("  Fifth push: {}", e);
    }
    println!("  Backing words:\n{:b}", ids.as_packed());

    Ok(())
}

fn example_search() -> Result<(), PackedError> {
    println!("Example 2: Scalar and batch search");

    let values: Vec<u64> = (0..20).collect();
    let column = PackedVec::from_values(17, &values)?;

    let scalar = column.scalar_search(7);
    let batch = column.batch_search_with(7, SearchStrategy::Auto)?;
    println!(
        "  Match positions: {:?}",
        batch
            .iter()
            .enumerate()
            .filter(|&(_, &hit)| hit)
            .map(|(i, _)| i)
            .collect::<Vec<_>>()
    );
    println!("  Scalar and batch agree: {}", scalar == batch);

    let wide = PackedVec::from_values(40, &values)?;
    match wide.batch_search(7) {
        Ok(_) => println!("  40-bit batch search ran"),
        Err(e) => println!("  40-bit batch search: {} (scalar fallback)", e),
    }
    println!();

    Ok(())
}

fn example_memory_savings() -> Result<(), PackedError> {
    println!("Example 3: Memory savings");

    let count = 1_000_000;
    let column = PackedVec::new(17, count)?;
    let packed_bytes = column.words().len() * 8;
    let plain_bytes = count * 4;

    println!("  Vec<u32>:       {} bytes", plain_bytes);
    println!("  PackedVec (17): {} bytes", packed_bytes);
    println!(
        "  Savings:        {:.1}%",
        100.0 * (1.0 - packed_bytes as f64 / plain_bytes as f64)
    );

    Ok(())
}
