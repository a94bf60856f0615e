//! Generator listing command.

use polytone_synth::Generator;

pub fn run() -> anyhow::Result<()> {
    println!("Available Generators");
    println!("====================\n");
    for generator in Generator::ALL {
        let default = if generator == Generator::default() {
            " (default)"
        } else {
            ""
        };
        println!(
            "  {:<10} {}{}",
            generator.name(),
            generator.description(),
            default
        );
    }
    Ok(())
}
