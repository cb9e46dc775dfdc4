use std::collections::HashMap;
use std::env;
use zebra_label::{
    encode_graphics_field, zpl_from_template, Config, FieldImage, ImageSource, LabelSource,
    PhotoOptions, Printer,
};
//
// cargo run --example render_template demos/assets/label.zpl logo.png
//

fn print_usage() {
    println!("Usage: cargo run --example render_template <TEMPLATE> <IMAGE>");
    println!("The template may use ${{title}} and ${{graphic}} placeholders.");
}

fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        print_usage();
        return;
    }

    let options = PhotoOptions::new().rotate(true);
    let graphic = match FieldImage::open(ImageSource::Path(args[2].clone().into()), options)
        .and_then(|image| encode_graphics_field(&image))
    {
        Ok(field) => field,
        Err(err) => {
            eprintln!("Failed to load/convert image: {}", err);
            return;
        }
    };

    let mut fields = HashMap::new();
    fields.insert("title".to_string(), "Sample".to_string());
    fields.insert("graphic".to_string(), graphic.to_string());

    let zpl = match zpl_from_template(&args[1], &fields) {
        Ok(zpl) => zpl,
        Err(err) => {
            eprintln!("Failed to render template: {}", err);
            return;
        }
    };

    match Printer::new(Config::from_env()) {
        Ok(printer) => match printer.render_label(LabelSource::Zpl(zpl)) {
            Ok(preview) => match preview.save("preview.png") {
                Ok(()) => println!("Preview saved to preview.png"),
                Err(err) => eprintln!("Failed to save preview: {}", err),
            },
            Err(err) => eprintln!("Render failed: {:?}", err),
        },
        Err(err) => eprintln!("Failed to initialize printer: {:?}", err),
    }
}
