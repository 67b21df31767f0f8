// src/banner.rs

/// Prints the application startup banner to the console.
pub fn print_banner() {
    let banner = r#"
            _                     _     
  ___ _   _| |__   ___ _ __   ___| |__  
 / __| | | | '_ \ / _ \ '_ \ / __| '_ \ 
| (__| |_| | |_) |  __/ | | | (__| | | |
 \___|\__,_|_.__/ \___|_| |_|\___|_| |_|

    On-chain Compute Unit Benchmark
"#;
    println!("{}", banner);
}
