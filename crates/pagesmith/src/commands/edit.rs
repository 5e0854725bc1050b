//! Line-oriented editing session.
//!
//! Reads one command per line from stdin and routes every change through the
//! [`Editor`], so history and persistence behave exactly as they would in a
//! graphical host.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use pagesmith_export::{embed_local_images, Exporter};
use pagesmith_gateway::{ContentApi, ImageUpload};
use pagesmith_model::{
    next_id, Banner, BlobSource, BlobStore, GalleryImage, ImageRef, ItemId, Section, SectionBody,
    SectionKind, SectionPatch,
};
use pagesmith_store::Editor;

use crate::config::ConfigFile;

/// Banner fields that can be edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerField {
    Title,
    Subtitle,
    CtaText,
    CtaLink,
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    Add { kind: SectionKind, title: String },
    Title { id: ItemId, title: String },
    Content { id: ItemId, content: String },
    Banner { field: BannerField, value: String },
    Move { from: usize, to: usize },
    Remove { id: ItemId },
    Image { path: PathBuf, target: Option<ItemId> },
    Undo,
    Redo,
    Show,
    Export { dir: Option<PathBuf> },
    Help,
    Quit,
}

impl EditCommand {
    /// Parse one line. Blank lines parse to `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb {
            "add" => {
                let (kind, title) = split_word(rest);
                let kind = kind.parse::<SectionKind>().map_err(|e| e.to_string())?;
                Self::Add {
                    kind,
                    title: title.to_string(),
                }
            }
            "title" => {
                let (id, title) = split_word(rest);
                Self::Title {
                    id: parse_num(id, "section id")?,
                    title: title.to_string(),
                }
            }
            "content" => {
                let (id, content) = split_word(rest);
                Self::Content {
                    id: parse_num(id, "section id")?,
                    content: content.to_string(),
                }
            }
            "banner" => {
                let (field, value) = split_word(rest);
                let field = match field {
                    "title" => BannerField::Title,
                    "subtitle" => BannerField::Subtitle,
                    "cta" => BannerField::CtaText,
                    "link" => BannerField::CtaLink,
                    other => return Err(format!("Unknown banner field: {other:?}")),
                };
                Self::Banner {
                    field,
                    value: value.to_string(),
                }
            }
            "move" => {
                let (from, to) = split_word(rest);
                Self::Move {
                    from: parse_num(from, "from index")?,
                    to: parse_num(to, "to index")?,
                }
            }
            "remove" => Self::Remove {
                id: parse_num(rest, "section id")?,
            },
            "image" => {
                let (path, target) = split_word(rest);
                if path.is_empty() {
                    return Err("Usage: image <path> [section id]".to_string());
                }
                let target = if target.is_empty() {
                    None
                } else {
                    Some(parse_num(target, "section id")?)
                };
                Self::Image {
                    path: PathBuf::from(path),
                    target,
                }
            }
            "undo" => Self::Undo,
            "redo" => Self::Redo,
            "show" => Self::Show,
            "export" => Self::Export {
                dir: (!rest.is_empty()).then(|| PathBuf::from(rest)),
            },
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(format!("Unknown command: {other:?} (try 'help')")),
        };

        Ok(Some(command))
    }
}

fn split_word(s: &str) -> (&str, &str) {
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (s, ""),
    }
}

fn parse_num<T: std::str::FromStr>(s: &str, what: &str) -> Result<T, String> {
    s.parse().map_err(|_| format!("Expected {what}, got {s:?}"))
}

const HELP: &str = "\
add <text|about|services|gallery> [title]
title <id> <text>          content <id> <text>
banner <title|subtitle|cta|link> <text>
move <from> <to>           remove <id>
image <path> [id]          attach to a section, or the banner without an id
undo | redo | show | export [dir] | quit";

/// Run the edit command.
pub async fn run(config: &ConfigFile) -> Result<()> {
    let (gateway, session) = super::connect(config).await?;
    if !session.is_authenticated() {
        tracing::info!("Not signed in; changes are kept in the local cache if the API refuses them");
    }

    let mut editor = Editor::open(gateway).await;
    let blobs = BlobStore::new();

    println!("{HELP}");
    print_outline(&editor);

    let input = BufReader::new(tokio::io::stdin());
    edit_session(&mut editor, &blobs, config, input).await
}

/// Drive `editor` from `input` until `quit`, end of input, Ctrl-C or a read
/// error. Local blobs are embedded and saved on every one of those exits.
pub async fn edit_session<A, R>(
    editor: &mut Editor<A>,
    blobs: &BlobStore,
    config: &ConfigFile,
    input: R,
) -> Result<()>
where
    A: ContentApi,
    R: AsyncBufRead + Unpin,
{
    let exporter = Exporter::new(config.export_config(None), blobs.clone());
    let mut lines = input.lines();

    let outcome = loop {
        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = tokio::signal::ctrl_c() => break Ok(()),
        };
        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break Ok(()),
            Err(e) => break Err(anyhow::Error::new(e).context("Failed to read input")),
        };

        let command = match EditCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        match command {
            EditCommand::Quit => break Ok(()),
            EditCommand::Help => println!("{HELP}"),
            EditCommand::Show => match serde_json::to_string_pretty(editor.current()) {
                Ok(json) => println!("{json}"),
                Err(e) => println!("{e}"),
            },
            EditCommand::Export { dir } => {
                let dir = dir.unwrap_or_else(|| config.export.output.clone());
                match exporter.export_to(editor.current(), &dir).await {
                    Ok(result) => println!("Wrote {}", result.path.display()),
                    Err(e) => println!("Export failed: {e}"),
                }
            }
            command => match apply(editor, blobs, command).await {
                Ok(true) => print_outline(editor),
                Ok(false) => println!("Nothing changed"),
                Err(e) => println!("{e:#}"),
            },
        }
    };

    embed_before_exit(editor, blobs).await;
    outcome
}

/// Blob handles die with this process; store their bytes inline instead.
async fn embed_before_exit<A: ContentApi>(editor: &Editor<A>, blobs: &BlobStore) {
    if editor.current().local_blob_refs().is_empty() {
        return;
    }
    let portable = embed_local_images(editor.current(), blobs).await;
    editor.gateway().save(&portable).await;
    tracing::info!("Embedded local images into the saved page");
}

/// Apply one mutating command. Returns whether the page changed.
pub async fn apply<A: ContentApi>(
    editor: &mut Editor<A>,
    blobs: &BlobStore,
    command: EditCommand,
) -> Result<bool> {
    let changed = match command {
        EditCommand::Add { kind, title } => {
            editor.add_section(Section::new(next_id(), kind, title)).await
        }
        EditCommand::Title { id, title } => {
            editor.update_section(id, SectionPatch::title(title)).await
        }
        EditCommand::Content { id, content } => {
            let body = match editor.current().section(id).map(|s| &s.body) {
                Some(SectionBody::Text { image, .. }) => SectionBody::Text {
                    content,
                    image: image.clone(),
                },
                Some(SectionBody::About { image, .. }) => SectionBody::About {
                    content,
                    image: image.clone(),
                },
                Some(_) => {
                    println!("Section {id} has no text content");
                    return Ok(false);
                }
                None => return Ok(false),
            };
            editor.update_section(id, SectionPatch::body(body)).await
        }
        EditCommand::Banner { field, value } => {
            let mut banner: Banner = (*editor.current().banner).clone();
            match field {
                BannerField::Title => banner.title = value,
                BannerField::Subtitle => banner.subtitle = value,
                BannerField::CtaText => banner.cta_text = value,
                BannerField::CtaLink => banner.cta_link = value,
            }
            editor.update_banner(banner).await
        }
        EditCommand::Move { from, to } => {
            let len = editor.current().sections.len();
            if from >= len || to >= len {
                println!("Indexes must be below {len}");
                return Ok(false);
            }
            editor.move_section(from, to).await
        }
        EditCommand::Remove { id } => editor.remove_section(id).await,
        EditCommand::Image { path, target } => {
            let image = attach_image(editor, blobs, &path).await?;
            set_image(editor, target, image).await
        }
        EditCommand::Undo => editor.undo().await,
        EditCommand::Redo => editor.redo().await,
        EditCommand::Show | EditCommand::Export { .. } | EditCommand::Help | EditCommand::Quit => {
            false
        }
    };
    Ok(changed)
}

/// Park the file as a local blob, then try to upload it. A failed upload
/// keeps the blob reference.
async fn attach_image<A: ContentApi>(
    editor: &Editor<A>,
    blobs: &BlobStore,
    path: &Path,
) -> Result<ImageRef> {
    let local = blobs
        .insert_file(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let blob = blobs.fetch(local.as_str()).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    match editor
        .upload_image(ImageUpload::from_blob(&blob, file_name))
        .await
    {
        Ok(remote) => {
            blobs.revoke(local.as_str()).await;
            Ok(remote)
        }
        Err(e) => {
            tracing::warn!("Upload failed, keeping local copy: {}", e);
            Ok(local)
        }
    }
}

async fn set_image<A: ContentApi>(
    editor: &mut Editor<A>,
    target: Option<ItemId>,
    image: ImageRef,
) -> bool {
    let Some(id) = target else {
        let banner = Banner {
            background_image: Some(image),
            ..(*editor.current().banner).clone()
        };
        return editor.update_banner(banner).await;
    };

    let body = match editor.current().section(id).map(|s| &s.body) {
        Some(SectionBody::Text { content, .. }) => SectionBody::Text {
            content: content.clone(),
            image: Some(image),
        },
        Some(SectionBody::About { content, .. }) => SectionBody::About {
            content: content.clone(),
            image: Some(image),
        },
        Some(SectionBody::Gallery { images }) => {
            let mut images = images.clone();
            images.push(GalleryImage {
                id: next_id(),
                url: image,
                alt: String::new(),
            });
            SectionBody::Gallery { images }
        }
        Some(SectionBody::Services { .. }) => {
            println!("Service icons are set per item; attach to a text, about or gallery section");
            return false;
        }
        None => return false,
    };
    editor.update_section(id, SectionPatch::body(body)).await
}

fn print_outline<A: ContentApi>(editor: &Editor<A>) {
    let doc = editor.current();
    println!("Banner: {}", doc.banner.title);
    for (index, section) in doc.sections.iter().enumerate() {
        println!(
            "  [{index}] #{} {} {:?}",
            section.id,
            section.kind(),
            section.title
        );
    }
    println!(
        "  (undo: {}, redo: {})",
        if editor.can_undo() { "yes" } else { "no" },
        if editor.can_redo() { "yes" } else { "no" }
    );
}
