use std::{path::PathBuf, process};

use csv_heatmap::{Colormap, HeatmapRenderer};
use structopt::{clap::ErrorKind, StructOpt};

const USAGE: &str = "Pass 2 args: csv file, output image name";

#[derive(Debug, StructOpt)]
#[structopt(name = "csv-heatmap", about = "Heatmap image of a CSV grid of numbers")]
struct Opt {
    /// CSV file of comma separated numbers
    #[structopt(parse(from_os_str))]
    csv: PathBuf,
    /// Output image, the format follows the file extension
    #[structopt(parse(from_os_str))]
    image: PathBuf,
    /// Color map: hot, inferno, magma, plasma, viridis, cividis, turbo, cubehelix or greys
    #[structopt(short, long, default_value = "hot")]
    colormap: Colormap,
    /// Cell size in pixels
    #[structopt(long)]
    cell_size: Option<u32>,
    /// Number of colorbar ticks
    #[structopt(long, default_value = "5")]
    ticks: usize,
    /// Leave out the colorbar
    #[structopt(long)]
    no_colorbar: bool,
    /// TrueType font for the colorbar labels
    #[structopt(long, parse(from_os_str))]
    font: Option<PathBuf>,
    /// Print the grid summary
    #[structopt(short, long)]
    summary: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let opt = match Opt::from_iter_safe(std::env::args_os()) {
        Ok(opt) => opt,
        Err(e) if matches!(e.kind, ErrorKind::HelpDisplayed | ErrorKind::VersionDisplayed) => {
            e.exit()
        }
        Err(e) => {
            log::debug!("{}", e.message);
            println!("{}", USAGE);
            process::exit(2);
        }
    };

    let mut renderer = HeatmapRenderer::default()
        .colormap(opt.colormap)
        .ticks(opt.ticks)
        .colorbar(!opt.no_colorbar);
    if let Some(arg) = opt.cell_size {
        renderer = renderer.cell_size(arg);
    }
    if let Some(arg) = opt.font {
        renderer = renderer.font(arg);
    }

    let grid = renderer.load(&opt.csv)?;
    if opt.summary {
        println!("{}", grid.summary());
    }
    renderer.draw(&grid)?.save(&opt.image)?;
    log::info!("{:?} -> {:?}", opt.csv, opt.image);

    Ok(())
}
