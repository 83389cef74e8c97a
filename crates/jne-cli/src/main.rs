use clap::{Args as ClapArgs, Parser, Subcommand};
use jne_core::{DocumentStore, FileDocumentStore, StoreOptions, Workbench};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "jne-cli",
    about = "Inspect and edit JSON graph nodes by JSON Pointer",
    version
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// List graph nodes of a JSON document
    Nodes(FileArgs),
    /// Print the editable snippet of a node
    Show(PtrArgs),
    /// Get value at JSON pointer
    Get(PtrArgs),
    /// Set value (raw JSON) at JSON pointer; prints or writes with --out
    Set(SetArgs),
    /// Merge an edited snippet into a node and save the document
    Edit(EditArgs),
    /// List JSON documents below a directory
    Docs(DocsArgs),
}

#[derive(ClapArgs, Debug)]
struct FileArgs {
    /// JSON document to load
    path: PathBuf,
}

#[derive(ClapArgs, Debug)]
struct PtrArgs {
    /// JSON document to load
    path: PathBuf,
    /// JSON Pointer, e.g. /items/0 ("" is the root)
    #[arg(long, default_value = "")]
    ptr: String,
}

#[derive(ClapArgs, Debug)]
struct SetArgs {
    /// JSON document to load
    path: PathBuf,
    /// JSON Pointer, e.g. /items/0
    #[arg(long, default_value = "")]
    ptr: String,
    /// New value as raw JSON (e.g., 123, true, "str", {"a":1})
    #[arg(long)]
    value: String,
    /// Optional output .json path to write; otherwise prints to stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
struct EditArgs {
    /// JSON document to edit in place
    path: PathBuf,
    /// Node id (JSON Pointer) as listed by `nodes`
    #[arg(long, default_value = "")]
    ptr: String,
    /// Edited snippet: an object for keyed nodes, any JSON value for bare nodes
    #[arg(long)]
    snippet: String,
    /// Zip the document next to itself before overwriting
    #[arg(long, default_value_t = false)]
    backup: bool,
}

#[derive(ClapArgs, Debug)]
struct DocsArgs {
    /// Directory to scan
    #[arg(default_value = ".")]
    dir: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Nodes(a) => cmd_nodes(a),
        Cmd::Show(a) => cmd_show(a),
        Cmd::Get(a) => cmd_get(a),
        Cmd::Set(a) => cmd_set(a),
        Cmd::Edit(a) => cmd_edit(a),
        Cmd::Docs(a) => cmd_docs(a),
    }
}

fn fail(code: i32, msg: impl std::fmt::Display) -> ! {
    eprintln!("error: {}", msg);
    std::process::exit(code);
}

fn open(path: PathBuf, options: StoreOptions) -> Workbench<FileDocumentStore> {
    let wb = Workbench::open(FileDocumentStore::new(path, options)).unwrap_or_else(|e| fail(2, e));
    log::debug!(
        "loaded {} with {} node(s)",
        wb.document().path().display(),
        wb.graph().nodes().len()
    );
    wb
}

fn load_value(path: &Path) -> serde_json::Value {
    let text = FileDocumentStore::new(path, StoreOptions::default())
        .current_text()
        .unwrap_or_else(|e| fail(2, e));
    serde_json::from_str(&text).unwrap_or_else(|e| fail(2, format!("invalid JSON: {}", e)))
}

fn cmd_nodes(args: FileArgs) {
    let wb = open(args.path, StoreOptions::default());
    for node in wb.graph().nodes() {
        let primitives = node.primitive_fields().count();
        let shape = if jne_core::is_object_shaped(&node.fields) {
            "object"
        } else if primitives > 0 {
            "value"
        } else {
            "-"
        };
        let id = if node.id.is_empty() { "(root)" } else { node.id.as_str() };
        println!("{}\t{}\t{} field(s)", id, shape, primitives);
    }
}

fn cmd_show(args: PtrArgs) {
    let mut wb = open(args.path, StoreOptions::default());
    if let Err(e) = wb.select(&args.ptr) {
        fail(3, e);
    }
    println!("{}", wb.session().normalized());
}

fn cmd_get(args: PtrArgs) {
    let v = load_value(&args.path);
    let path = jne_core::parse_pointer(&args.ptr).unwrap_or_else(|e| fail(3, e));
    match jne_core::read_at(&v, &path) {
        Some(x) => println!("{}", jne_core::to_pretty(x).unwrap_or_else(|e| fail(5, e))),
        None => fail(3, format!("not found: {}", args.ptr)),
    }
}

fn cmd_set(args: SetArgs) {
    let v = load_value(&args.path);
    let new_val: serde_json::Value = serde_json::from_str(&args.value)
        .unwrap_or_else(|e| fail(3, format!("invalid --value JSON: {}", e)));
    let path = jne_core::parse_pointer(&args.ptr).unwrap_or_else(|e| fail(3, e));
    let v = jne_core::write_at(v, &path, new_val).unwrap_or_else(|e| fail(4, e));
    let text = jne_core::to_pretty(&v).unwrap_or_else(|e| fail(5, e));
    if let Some(out) = args.out {
        std::fs::write(&out, text).unwrap_or_else(|e| fail(5, format!("writing: {}", e)));
    } else {
        println!("{}", text);
    }
}

fn cmd_edit(args: EditArgs) {
    let mut wb = open(
        args.path,
        StoreOptions {
            backup_on_save: args.backup,
        },
    );
    if let Err(e) = wb.select(&args.ptr) {
        fail(3, e);
    }
    if !wb.session_mut().start_editing() {
        fail(3, format!("node has no editable fields: {}", args.ptr));
    }
    wb.session_mut().set_draft(args.snippet);
    if let Err(e) = wb.save() {
        fail(if e.is_user_error() { 4 } else { 5 }, e);
    }
    if let Some(b) = wb.document().last_backup() {
        eprintln!("backup: {}", b.display());
    }
    println!("{}", wb.session().normalized());
}

fn cmd_docs(args: DocsArgs) {
    for p in jne_core::documents::list_documents(&args.dir) {
        println!("{}", p.display());
    }
}
