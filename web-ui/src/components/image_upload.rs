// Image picker with drag-and-drop and preview

use skinscan_core::{ImageConstraints, MediaSelection, SelectedImage};
use wasm_bindgen_futures::spawn_local;
use web_sys::{DragEvent, File, HtmlInputElement};
use yew::prelude::*;

use crate::media::{read_file, PreviewUrl};

#[derive(Properties, PartialEq)]
pub struct ImageUploadProps {
    pub image: Option<SelectedImage>,
    pub constraints: ImageConstraints,
    pub on_select: Callback<SelectedImage>,
    pub on_clear: Callback<()>,
    pub on_open_camera: Callback<()>,
}

enum Source {
    Picker(File),
    Drop(Option<File>),
}

#[function_component(ImageUpload)]
pub fn image_upload(props: &ImageUploadProps) -> Html {
    let selection = {
        let constraints = props.constraints.clone();
        use_mut_ref(move || MediaSelection::new(constraints))
    };
    let error = use_state(|| None::<String>);
    let dragging = use_state(|| false);
    let input_ref = use_node_ref();

    let preview = {
        let image = props.image.clone();
        use_memo(props.image.as_ref().map(|i| i.id), move |_| {
            image.as_ref().and_then(|i| PreviewUrl::for_image(i).ok())
        })
    };

    let accept = {
        let selection = selection.clone();
        let error = error.clone();
        let on_select = props.on_select.clone();
        let on_clear = props.on_clear.clone();

        Callback::from(move |source: Source| {
            let selection = selection.clone();
            let error = error.clone();
            let on_select = on_select.clone();
            let on_clear = on_clear.clone();

            spawn_local(async move {
                let (file, dropped) = match source {
                    Source::Picker(file) => (file, false),
                    Source::Drop(Some(file)) => (file, true),
                    Source::Drop(None) => {
                        let empty = selection.borrow_mut().select_dropped(Vec::new()).err();
                        if let Some(e) = empty {
                            error.set(Some(e.to_string()));
                            on_clear.emit(());
                        }
                        return;
                    }
                };

                // Type and size come from the file's metadata, ahead of reading its bytes
                let size = file.size() as usize;
                let declared = selection
                    .borrow_mut()
                    .check_declared(&file.type_(), size, dropped);
                let outcome = match declared {
                    Ok(()) => match read_file(&file).await {
                        Ok(blob) if dropped => {
                            selection.borrow_mut().select_dropped(vec![blob]).cloned()
                        }
                        Ok(blob) => selection.borrow_mut().select_from_file(blob).cloned(),
                        Err(e) => {
                            error.set(Some(e.to_string()));
                            return;
                        }
                    },
                    Err(e) => Err(e),
                };

                match outcome {
                    Ok(image) => {
                        error.set(None);
                        on_select.emit(image);
                    }
                    Err(e) => {
                        error.set(Some(e.to_string()));
                        on_clear.emit(());
                    }
                }
            });
        })
    };

    let on_change = {
        let accept = accept.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            if let Some(file) = input.files().and_then(|files| files.get(0)) {
                accept.emit(Source::Picker(file));
            }
            // Allow picking the same file again
            input.set_value("");
        })
    };

    let on_browse = {
        let input_ref = input_ref.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(input) = input_ref.cast::<HtmlInputElement>() {
                input.click();
            }
        })
    };

    let on_drag_over = {
        let dragging = dragging.clone();
        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            dragging.set(true);
        })
    };

    let on_drag_leave = {
        let dragging = dragging.clone();
        Callback::from(move |_: DragEvent| dragging.set(false))
    };

    let on_drop = {
        let dragging = dragging.clone();
        let accept = accept.clone();
        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            dragging.set(false);
            let first = e
                .data_transfer()
                .and_then(|dt| dt.files())
                .and_then(|files| files.get(0));
            accept.emit(Source::Drop(first));
        })
    };

    let on_remove = {
        let selection = selection.clone();
        let error = error.clone();
        let on_clear = props.on_clear.clone();
        Callback::from(move |_: MouseEvent| {
            selection.borrow_mut().clear();
            error.set(None);
            on_clear.emit(());
        })
    };

    let on_camera = {
        let on_open_camera = props.on_open_camera.clone();
        Callback::from(move |_: MouseEvent| on_open_camera.emit(()))
    };

    let accept_attr = props.constraints.accepted_mime_types.join(",");

    html! {
        <div class="image-upload">
            <input
                ref={input_ref}
                type="file"
                class="file-input"
                accept={accept_attr}
                onchange={on_change}
                style="display: none"
            />
            {
                match (props.image.as_ref(), (*preview).as_ref()) {
                    (Some(image), Some(url)) => html! {
                        <div class="image-preview">
                            <img src={url.url().to_string()} alt="Selected skin image" />
                            <div class="image-meta">
                                <span class="file-name">{ image.file_name.clone() }</span>
                                <span class="file-size">{ format_size(image.size_bytes()) }</span>
                            </div>
                            <button class="remove-image" onclick={on_remove}>{ "Remove" }</button>
                        </div>
                    },
                    (Some(image), None) => html! {
                        <div class="image-preview">
                            <span class="file-name">{ image.file_name.clone() }</span>
                            <button class="remove-image" onclick={on_remove}>{ "Remove" }</button>
                        </div>
                    },
                    _ => html! {
                        <div
                            class={classes!("drop-zone", dragging.then_some("dragging"))}
                            ondragover={on_drag_over}
                            ondragleave={on_drag_leave}
                            ondrop={on_drop}
                        >
                            <p>{ "Drag and drop a photo of the affected skin here" }</p>
                            <p class="hint">
                                { format!("JPEG or PNG, up to {} MB", props.constraints.max_size_mb) }
                            </p>
                            <div class="upload-actions">
                                <button class="browse-button" onclick={on_browse}>{ "Choose file" }</button>
                                <button class="camera-button" onclick={on_camera}>{ "Use camera" }</button>
                            </div>
                        </div>
                    },
                }
            }
            if let Some(message) = (*error).clone() {
                <div class="field-error">{ message }</div>
            }
        </div>
    }
}

fn format_size(bytes: usize) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{} KB", bytes.div_ceil(1024))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(2 * 1024 * 1024), "2.0 MB");
        assert_eq!(format_size(1500), "2 KB");
    }
}
