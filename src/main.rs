use blog_routes::registry::RouteTable;
use blog_routes::scan::FsContentSource;
use blog_routes::{bundler, config, output, pipeline, scan};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "blog-routes")]
#[command(about = "Plan the routes of a markdown blog")]
#[command(long_about = "\
Plan the routes of a markdown blog

Every top-level directory of the content root is a collection, and every
.md/.mdx file below it is a post with YAML frontmatter.

Content structure:

  content/
  ├── config.toml                      # Build config (optional)
  ├── legacy/                          # Legacy collection: dated URLs
  │   └── 01-02-03-my-post.md          # → blog/2019/05/10/my-post
  └── posts/
      └── 01-02-03-hello-world.mdx     # → frontmatter slug, or hello-world

Slug resolution:
  Legacy:  blog/YYYY/MM/DD/<filename minus first three dash segments>
  Others:  frontmatter `slug`, else the filename minus its prefix

Posts with `hidden: true` are skipped. Each frontmatter `redirects` entry
becomes a permanent redirect to the post's slug.

Run 'blog-routes gen-config' to print a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory for routes.json, _redirects, and bundler.json
    #[arg(long, default_value = "public", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifest)
    #[arg(long, default_value = ".blog-routes-temp", global = true)]
    temp_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the content directory into a manifest
    Scan,
    /// Run the full pipeline and write routes, redirects, and bundler config
    Build,
    /// Validate content and routes without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Scan => {
            let site_config = config::load_config(&cli.source)?;
            let manifest = scan::scan(&cli.source, &site_config)?;
            std::fs::create_dir_all(&cli.temp_dir)?;
            let manifest_path = cli.temp_dir.join("manifest.json");
            let json = serde_json::to_string_pretty(&manifest)?;
            std::fs::write(&manifest_path, json)?;
            output::print_scan_output(&manifest);
        }
        Command::Build => {
            let site_config = config::load_config(&cli.source)?;

            println!("==> Stage 1: Scanning {}", cli.source.display());
            let source = FsContentSource::new(&cli.source, &site_config);

            println!("==> Stage 2: Resolving slugs and sequencing posts");
            let mut table = RouteTable::new();
            let report = pipeline::run(&source, &mut table, &site_config)?;
            output::print_warnings(&report.warnings);
            output::print_build_output(&report, &table);

            println!("==> Stage 3: Writing routes \u{2192} {}", cli.output.display());
            table.write(&cli.output)?;
            let base = std::env::current_dir()?;
            bundler::write(&bundler::resolve(&site_config.bundler, &base), &cli.output)?;

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let site_config = config::load_config(&cli.source)?;
            let source = FsContentSource::new(&cli.source, &site_config);
            let (directives, _, warnings) = pipeline::plan(&source, &site_config)?;
            output::print_warnings(&warnings);
            println!(
                "==> Content is valid: {} pages, {} redirects",
                directives.pages.len(),
                directives.redirects.len()
            );
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
