//! Well-known types command implementation.

use protofmt_core::WellKnownTypes;

/// Runs the wkt command.
pub fn run() {
    let registry = WellKnownTypes::standard();

    println!("Well-known types ({}):\n", registry.len());
    println!("{:<40} {:<25} Go package", "File", "Package");
    println!("{}", "-".repeat(100));

    for wkt in registry.iter() {
        println!(
            "{:<40} {:<25} {}",
            wkt.filename, wkt.package, wkt.go_package
        );
    }

    println!("\nImports of these files are grouped ahead of all other imports.");
}
