use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;

use zebra_label::{
    encode_graphics_field, symbol_field, zpl_from_template, Config, Error, FieldImage,
    GraphicsField, ImageSource, LabelSource, PhotoOptions, Printer, SymbolKind, SymbolOptions,
};

//
// cargo run -- qr "12345-3" --command
// cargo run -- --url http://192.168.3.160 print --file label.zpl
//
#[derive(Parser, Debug)]
#[command(name = "zebra-label")]
#[command(about = "Build ZPL graphics fields and send labels to Zebra printers")]
struct Args {
    /// Printer address, overrides ZEBRA_URL
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode an image file as a graphics field
    Field {
        image: PathBuf,
        /// Rotate 270 degrees before thresholding
        #[arg(long)]
        rotate: bool,
        /// Wrap the field in ^GF ... ^FS
        #[arg(long)]
        command: bool,
    },
    /// Encode a QR code as a graphics field
    Qr {
        data: String,
        #[arg(long, default_value_t = 3)]
        scale: u32,
        #[arg(long, default_value_t = 1)]
        margin: u32,
        #[arg(long)]
        command: bool,
    },
    /// Encode a square Data Matrix as a graphics field
    Datamatrix {
        data: String,
        #[arg(long, default_value_t = 3)]
        scale: u32,
        #[arg(long, default_value_t = 1)]
        margin: u32,
        #[arg(long)]
        command: bool,
    },
    /// Render a ZPL template with KEY=VALUE fields
    Template {
        file: PathBuf,
        fields: Vec<String>,
    },
    /// Print a label
    Print {
        #[arg(long)]
        zpl: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Render a label on the printer and save the preview
    Render {
        #[arg(long)]
        zpl: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(short, long, default_value = "preview.png")]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "[{}:{}] {} - {}",
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.level(),
                record.args()
            )
        })
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Error> {
    let config = match args.url {
        Some(url) => Config::new(url),
        None => Config::from_env(),
    };

    match args.command {
        Command::Field {
            image,
            rotate,
            command,
        } => {
            let image = FieldImage::open(ImageSource::Path(image), PhotoOptions::new().rotate(rotate))?;
            emit(&encode_graphics_field(&image)?, command);
        }
        Command::Qr {
            data,
            scale,
            margin,
            command,
        } => {
            let options = SymbolOptions::new().scale(scale).margin(margin);
            emit(&symbol_field(SymbolKind::QrCode, &data, options)?, command);
        }
        Command::Datamatrix {
            data,
            scale,
            margin,
            command,
        } => {
            let options = SymbolOptions::new().scale(scale).margin(margin);
            emit(&symbol_field(SymbolKind::DataMatrix, &data, options)?, command);
        }
        Command::Template { file, fields } => {
            let fields = parse_fields(&fields)?;
            print!("{}", zpl_from_template(file, &fields)?);
        }
        Command::Print { zpl, file } => {
            let source = LabelSource::from_parts(zpl, file)?;
            Printer::new(config)?.print_label(source)?;
            println!("Label sent");
        }
        Command::Render { zpl, file, output } => {
            let source = LabelSource::from_parts(zpl, file)?;
            let preview = Printer::new(config)?.render_label(source)?;
            preview.save(&output)?;
            println!("Preview saved to {}", output.display());
        }
    }
    Ok(())
}

fn emit(field: &GraphicsField, command: bool) {
    if command {
        println!("{}", field.to_command());
    } else {
        println!("{}", field);
    }
}

fn parse_fields(pairs: &[String]) -> Result<HashMap<String, String>, Error> {
    pairs
        .iter()
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => Ok((key.to_string(), value.to_string())),
            None => Err(Error::InvalidInput(format!("expected KEY=VALUE, got {:?}", pair))),
        })
        .collect()
}
