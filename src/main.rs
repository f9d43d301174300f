//! gecko's main application entry point and orchestration logic.
//! Collects the project name and template choice, then hands off to the
//! resolver and materializer.

use gecko::{
    bindings::build_bindings,
    cli::{get_args, Args},
    error::{default_error_handler, Result},
    loader::Resolver,
    logger::init_logger,
    processor::{check_destination, materialize},
    prompt::{ask_project_name, ask_template, DialoguerPrompter},
    renderer::MiniJinjaRenderer,
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Asks for the project name and template (flags win over prompts)
/// 2. Builds the variable bindings
/// 3. Checks the destination before any download
/// 4. Resolves the template, fetching remote sources into a staging directory
/// 5. Materializes the tree and prints next steps
fn run(args: Args) -> Result<()> {
    let engine = MiniJinjaRenderer::new();
    let prompt = DialoguerPrompter::new();
    let resolver = Resolver::new(&args.templates_dir);

    let project_name = ask_project_name(&prompt, args.name, args.no_input)?;
    let selector = ask_template(&prompt, &resolver, args.template, args.no_input)?;
    let bindings = build_bindings(&project_name, args.vars_file.as_deref(), &args.vars)?;

    let output_root = args.output_dir.join(&project_name);
    check_destination(&output_root)?;

    println!("Using template from the {selector}");
    if selector.is_remote() {
        println!("Fetching template, this may take a moment...");
    }
    let tree = resolver.resolve(selector)?;
    let written = materialize(tree, &output_root, &bindings, &engine)?;

    for path in &written {
        println!("Created: '{}'", output_root.join(path).display());
    }
    println!("Project '{project_name}' created successfully in {}.", output_root.display());
    println!();
    println!("Next steps:");
    println!("  cd {}", output_root.display());
    Ok(())
}
