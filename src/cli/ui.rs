use colored::Colorize;

pub fn display_warning(message: &str) {
    eprintln!("{} {}", "Warning:".yellow().bold(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "Success:".green().bold(), message);
}

/// Printed right above the QR code.
pub fn display_instructions(url: &str) {
    println!("Scan the following QR to start the download.");
    println!(
        "Make sure that your smartphone is connected to the same WiFi network as this computer."
    );
    println!("Or open {}", url.cyan().underline());
}
