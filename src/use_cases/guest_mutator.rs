// Create and update operations against the guest store.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

use crate::domain::{GuestError, GuestPatch, GuestStatus, GuestStore, NewGuest};
use crate::use_cases::feedback::{FeedbackBoard, FeedbackMessage};
use crate::use_cases::guest_list_sync::RefreshTrigger;
use crate::use_cases::image_normalizer::ImageNormalizer;
use crate::use_cases::view_model::GuestListView;

const NAME_REQUIRED: &str = "Por favor, preencha o nome do convidado.";
const NAME_NOT_FOUND: &str = "Nome do convidado não encontrado.";
const PHOTO_REQUIRED: &str = "Selecione uma foto para enviar.";
const PHOTO_UNREADABLE: &str = "Não foi possível processar a foto. Tente outra imagem.";

/// Form fields submitted when adding a guest.
#[derive(Debug, Clone)]
pub struct AddGuest {
    pub name: String,
    pub status: GuestStatus,
    pub photo: Option<Vec<u8>>,
}

/// The guest whose photo is being replaced, scoped to one request.
#[derive(Debug, Clone)]
pub struct PhotoEdit {
    pub guest_name: String,
    pub photo: Vec<u8>,
}

/// What the caller should do with its local UI state after an action.
#[derive(Debug, Clone, Serialize)]
pub struct MutationOutcome {
    pub feedback: FeedbackMessage,
    pub reset_form: bool,
    pub dismiss_editor: bool,
    pub refresh_scheduled: bool,
}

/// A failed action, with the message already shown to the user.
#[derive(Debug)]
pub struct MutationError {
    pub error: GuestError,
    pub feedback: FeedbackMessage,
}

pub struct GuestMutator<R> {
    pub store: Arc<dyn GuestStore>,
    pub feedback: Arc<FeedbackBoard>,
    pub normalizer: ImageNormalizer,
    pub refresh: R,
    // Last rendered snapshot, used to tell whether a guest is already confirmed.
    pub view: watch::Receiver<GuestListView>,
}

impl<R> GuestMutator<R>
where
    R: RefreshTrigger,
{
    pub async fn add_guest(&self, form: AddGuest) -> Result<MutationOutcome, MutationError> {
        let name = form.name.trim().to_string();
        if name.is_empty() {
            return Err(self.fail(GuestError::Validation(NAME_REQUIRED)).await);
        }

        self.feedback.info("Salvando...").await;

        let photo = match form.photo.filter(|bytes| !bytes.is_empty()) {
            Some(bytes) => match self.normalizer.normalize(bytes).await {
                Ok(photo) => Some(photo.data_url),
                Err(err) => {
                    tracing::warn!(error = %err, "guest photo could not be normalized");
                    return Err(self.fail_with(err, PHOTO_UNREADABLE).await);
                }
            },
            None => None,
        };

        let guest = NewGuest {
            name,
            status: form.status,
            photo,
        };
        if let Err(err) = self.store.create(guest).await {
            tracing::error!(error = %err, "failed to add guest");
            return Err(self
                .fail_with(err.into(), "Erro ao adicionar convidado. Tente novamente.")
                .await);
        }

        let feedback = self
            .feedback
            .success("Convidado adicionado com sucesso! ✓")
            .await;
        self.refresh.schedule_refresh();

        Ok(MutationOutcome {
            feedback,
            reset_form: true,
            dismiss_editor: false,
            refresh_scheduled: true,
        })
    }

    pub async fn confirm_status(&self, name: &str) -> Result<MutationOutcome, MutationError> {
        if name.is_empty() {
            return Err(self.fail(GuestError::Validation(NAME_NOT_FOUND)).await);
        }

        // A row already shown as confirmed has no confirm action; do not resend.
        let already_confirmed = self
            .view
            .borrow()
            .find(name)
            .is_some_and(|entry| !entry.can_confirm());
        if already_confirmed {
            tracing::debug!(guest = name, "guest already confirmed, skipping update");
            let feedback = self.feedback.info("Convidado já confirmado.").await;
            return Ok(MutationOutcome {
                feedback,
                reset_form: false,
                dismiss_editor: false,
                refresh_scheduled: false,
            });
        }

        self.feedback.info("Atualizando status...").await;

        if let Err(err) = self.store.update(name, GuestPatch::confirm()).await {
            tracing::error!(error = %err, guest = name, "failed to confirm guest");
            return Err(self
                .fail_with(err.into(), "Erro ao atualizar status. Tente novamente.")
                .await);
        }

        let feedback = self
            .feedback
            .success("Status atualizado para Confirmado! ✓")
            .await;
        self.refresh.schedule_refresh();

        Ok(MutationOutcome {
            feedback,
            reset_form: false,
            dismiss_editor: false,
            refresh_scheduled: true,
        })
    }

    pub async fn update_photo(&self, edit: PhotoEdit) -> Result<MutationOutcome, MutationError> {
        if edit.guest_name.is_empty() {
            return Err(self.fail(GuestError::Validation(NAME_NOT_FOUND)).await);
        }
        if edit.photo.is_empty() {
            return Err(self.fail(GuestError::Validation(PHOTO_REQUIRED)).await);
        }

        self.feedback.info("Enviando foto...").await;

        let photo = match self.normalizer.normalize(edit.photo).await {
            Ok(photo) => photo,
            Err(err) => {
                tracing::warn!(error = %err, guest = %edit.guest_name, "photo could not be normalized");
                return Err(self.fail_with(err, PHOTO_UNREADABLE).await);
            }
        };

        if let Err(err) = self
            .store
            .update(&edit.guest_name, GuestPatch::photo(photo.data_url))
            .await
        {
            tracing::error!(error = %err, guest = %edit.guest_name, "failed to update photo");
            return Err(self
                .fail_with(err.into(), "Erro ao atualizar foto. Tente novamente.")
                .await);
        }

        let feedback = self.feedback.success("Foto atualizada com sucesso! ✓").await;
        self.refresh.schedule_refresh();

        Ok(MutationOutcome {
            feedback,
            reset_form: false,
            dismiss_editor: true,
            refresh_scheduled: true,
        })
    }

    // Validation errors carry their own user-facing text.
    async fn fail(&self, error: GuestError) -> MutationError {
        let text = match &error {
            GuestError::Validation(message) => *message,
            GuestError::Decode(_) => PHOTO_UNREADABLE,
            GuestError::Transport(_) => "Erro de comunicação. Tente novamente.",
        };
        self.fail_with(error, text).await
    }

    async fn fail_with(&self, error: GuestError, text: &str) -> MutationError {
        let feedback = self.feedback.error(text).await;
        MutationError { error, feedback }
    }
}
