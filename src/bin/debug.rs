use ezcodec::format::read_ezc_file;
use ezcodec::EzcResult;

fn main() -> EzcResult<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: ezcdebug <file.ezc> [--blocks]");
        std::process::exit(1);
    }

    let path = &args[1];
    let show_blocks = args.iter().any(|a| a == "--blocks");

    println!("<--- EZC v1 File Debug --->\n");
    println!("File: {}", path);

    let file_size = std::fs::metadata(path)?.len();
    println!("Size: {} bytes", file_size);

    let (header, blocks) = read_ezc_file(path)?;

    println!("\n<--- Header --->");
    println!("Version: {}", header.version);
    println!("Width: {}", header.width);
    println!("Height: {}", header.height);
    println!("Quality: {}", header.quality);
    println!("Block Dim: {}", header.block_dim);
    println!(
        "Block Grid: {}x{} ({} blocks)",
        header.block_count_x,
        header.block_count_y,
        header.block_count()
    );

    let raw_size = header.pixel_count();
    let ratio = file_size as f64 / raw_size as f64 * 100.0;
    println!("\n<--- Compression Stats --->");
    println!("Raw size: {} bytes", raw_size);
    println!("Compressed: {} bytes", file_size);
    println!("Ratio: {:.1}%", ratio);

    let mut nonzero_total = 0usize;
    let mut zero_blocks = 0usize;
    let mut dc_min = i16::MAX;
    let mut dc_max = i16::MIN;

    if show_blocks {
        println!("\n<--- Blocks --->");
    }
    for block in &blocks {
        let nonzero = block.iter().filter(|&&c| c != 0).count();
        let dc = block[0];
        nonzero_total += nonzero;
        if nonzero == 0 {
            zero_blocks += 1;
        }
        dc_min = dc_min.min(dc);
        dc_max = dc_max.max(dc);

        if show_blocks {
            let peak = block.iter().skip(1).map(|c| c.unsigned_abs()).max().unwrap_or(0);
            println!(
                "({:>3}, {:>3})  dc {:>6}  non-zero {:>2}/64  peak ac {:>5}",
                block.block_x(),
                block.block_y(),
                dc,
                nonzero,
                peak
            );
        }
    }

    println!("\n<--- Coefficients --->");
    if blocks.is_empty() {
        println!("No blocks");
    } else {
        println!("DC range: {} .. {}", dc_min, dc_max);
        println!(
            "Non-zero per block: {:.2}",
            nonzero_total as f64 / blocks.len() as f64
        );
        println!("All-zero blocks: {}", zero_blocks);
    }

    println!("\n✓ File parsed successfully");

    Ok(())
}
