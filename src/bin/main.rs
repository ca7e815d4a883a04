use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use cloak_reconstruction::{render, Event, Session, SimulationParams};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "cloak-sim",
    about = "Optical cloaking and digital reconstruction simulation"
)]
struct Opt {
    /// Side length of the square grid in pixels
    #[structopt(long, default_value = "256")]
    grid_size: usize,
    /// Wavelength scaling the cloak phase shift
    #[structopt(long, default_value = "0.05")]
    wavelength: f64,
    /// Side length of the hidden square object in pixels
    #[structopt(long, default_value = "20")]
    object_size: usize,
    /// Outer radius of the cloak annulus in pixels
    #[structopt(long, default_value = "70")]
    outer_radius: f64,
    /// Inner radius of the cloak annulus in pixels
    #[structopt(long, default_value = "40")]
    inner_radius: f64,
    /// Refractive index of the cloaking material
    #[structopt(short = "n", long, default_value = "2.0")]
    refractive_index: f64,
    /// Advanced reconstruction iterations before any improve step
    #[structopt(long, default_value = "5")]
    base_iterations: usize,
    /// Iterations added by each improve step
    #[structopt(long, default_value = "2")]
    iteration_step: usize,
    /// Margin between the object and the support edge in pixels
    #[structopt(long, default_value = "10")]
    support_margin: usize,
    /// Number of improve steps applied before saving
    #[structopt(short, long, default_value = "0")]
    improve: usize,
    /// Read improve/reset/quit commands from stdin, redrawing after each
    #[structopt(long)]
    interactive: bool,
    /// Also write every panel to its own PNG file
    #[structopt(long)]
    panels: bool,
    /// Output directory
    #[structopt(short, long, default_value = ".", parse(from_os_str))]
    output: PathBuf,
}

impl Opt {
    fn params(&self) -> SimulationParams {
        SimulationParams::default()
            .grid_size(self.grid_size)
            .wavelength(self.wavelength)
            .object_size(self.object_size)
            .cloak_radii(self.inner_radius, self.outer_radius)
            .refractive_index(self.refractive_index)
            .iterations(self.base_iterations, self.iteration_step)
            .support_margin(self.support_margin)
    }
}

#[derive(Debug, PartialEq)]
enum Command {
    Event(Event),
    Quit,
    Skip,
}

fn parse_command(line: &str) -> Command {
    match line.trim().to_ascii_lowercase().as_str() {
        "" => Command::Skip,
        "q" | "quit" => Command::Quit,
        command => match command.parse::<Event>() {
            Ok(event) => Command::Event(event),
            Err(e) => {
                log::warn!("{}", e);
                Command::Skip
            }
        },
    }
}

fn redraw(session: &Session, output: &Path, panels: bool) -> anyhow::Result<()> {
    let path = output.join("figure.png");
    render::save_figure(&path, session)
        .with_context(|| format!("failed to save figure to {:?}", path))?;
    if panels {
        render::save_panels(output, session)
            .with_context(|| format!("failed to save panels to {:?}", output))?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    std::fs::create_dir_all(&opt.output)
        .with_context(|| format!("failed to create output folder {:?}", opt.output))?;

    let mut session = Session::new(opt.params())?;
    for _ in 0..opt.improve {
        session.handle(Event::Improve)?;
    }
    redraw(&session, &opt.output, opt.panels)?;

    if !opt.interactive {
        return Ok(());
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        write!(stdout, "[i]mprove, [r]eset or [q]uit > ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        match parse_command(&line) {
            Command::Quit => break,
            Command::Skip => continue,
            Command::Event(event) => {
                session.handle(event)?;
                redraw(&session, &opt.output, opt.panels)?;
                println!(
                    "improve steps: {}, iterations: {}",
                    session.improve_count(),
                    session.iterations()
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_ignore_case() {
        assert_eq!(parse_command("Quit\n"), Command::Quit);
        assert_eq!(parse_command(" Q "), Command::Quit);
        assert_eq!(parse_command("IMPROVE"), Command::Event(Event::Improve));
        assert_eq!(parse_command("r"), Command::Event(Event::Reset));
        assert_eq!(parse_command(""), Command::Skip);
        assert_eq!(parse_command("jump"), Command::Skip);
    }
}
