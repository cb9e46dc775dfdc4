use std::env;
use zebra_label::{symbol_field, Config, LabelSource, Printer, SymbolKind, SymbolOptions};
//
// cargo run --example print_qr 12345-3
//

fn main() {
    // Load environment variables from .env file
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

    let args: Vec<String> = env::args().collect();
    let data = if args.len() > 1 { args[1].as_str() } else { "12345-1" };

    let options = SymbolOptions::new().scale(4).margin(1);
    let field = match symbol_field(SymbolKind::QrCode, data, options) {
        Ok(field) => field,
        Err(err) => {
            eprintln!("Failed to encode symbol: {}", err);
            return;
        }
    };

    let zpl = format!(
        "^XA\n^FO30,30{}\n^FO30,{}^A0N,30,30^FD{}^FS\n^XZ\n",
        field.to_command(),
        field.height() + 50,
        data
    );
    println!("{}", zpl);

    match Printer::new(Config::from_env()) {
        Ok(printer) => match printer.print_label(LabelSource::Zpl(zpl)) {
            Ok(()) => println!("print success"),
            Err(err) => eprintln!("Print failed: {:?}", err),
        },
        Err(err) => eprintln!("Failed to initialize printer: {:?}", err),
    }
}
